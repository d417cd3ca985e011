//! Folding clauses into the running formula.
//!
//! With only negation and implication to hand:
//!
//! - A clause l₁ ∨ l₂ ∨ … ∨ lₙ is built left to right, each literal joined by ¬clause → lᵢ.
//! - The first clause is the running formula, and each later clause is joined by ¬(formula → ¬clause).
//! - The empty clause is F.
//!
//! The running formula is reduced after each fold.

use crate::{
    context::Context,
    io::window::{ContextWindow, WindowItem},
    procedures::reduce::reduce_with_limit,
    rules::RuleRepository,
    structures::formula::Formula,
    types::err::ErrorKind,
};

/// The disjunction of `literals`, or F if there are none.
pub fn clause_formula(literals: impl IntoIterator<Item = Formula>) -> Formula {
    let mut literals = literals.into_iter();
    let Some(mut clause) = literals.next() else {
        return Formula::constant(false);
    };
    for literal in literals {
        clause = Formula::disjunction(clause, literal);
    }
    clause
}

impl<R: RuleRepository> Context<R> {
    /// Folds the clause of `literals` into the running formula, and reduces.
    ///
    /// Repeated literals are folded once.
    /// If reduction fails the clause is not counted, and the running formula is as before the call.
    pub fn add_clause(&mut self, literals: Vec<Formula>) -> Result<(), ErrorKind> {
        let mut distinct: Vec<Formula> = Vec::with_capacity(literals.len());
        for literal in literals {
            if !distinct.contains(&literal) {
                distinct.push(literal);
            }
        }

        let clause = clause_formula(distinct);
        let folded = match &self.formula {
            None => clause,
            Some(formula) => Formula::conjunction(formula.clone(), clause),
        };

        // on failure the clause is not folded, and the formula is unchanged
        let unreduced_length = folded.length();
        let reduced = reduce_with_limit(&folded, &self.repository, self.config.pass_limit)?;

        self.counters.clauses += 1;
        self.counters.peak_length = std::cmp::max(self.counters.peak_length, unreduced_length);
        self.counters.length = reduced.length();

        log::debug!(target: crate::log::targets::FOLD,
            "Clause {} folded, length {unreduced_length} reduced to {}", self.counters.clauses, reduced.length());

        self.formula = Some(reduced);

        if self.config.show_stats {
            self.update_window();
        }

        Ok(())
    }

    fn update_window(&mut self) {
        if self.window.is_none() && self.counters.clauses == 1 {
            match ContextWindow::new() {
                Ok(window) => self.window = Some(window),
                Err(e) => log::warn!(target: crate::log::targets::FOLD, "Stats unavailable: {e}"),
            }
        }

        let interval = crate::config::defaults::WINDOW_INTERVAL;
        if self.counters.clauses == 1 || self.counters.clauses % interval == 0 {
            self.draw_window();
        }
    }

    /// Redraws the stats window, if there is one.
    pub fn draw_window(&mut self) {
        let Some(window) = &self.window else {
            return;
        };

        let drawn = window
            .update_item(WindowItem::Clauses, self.counters.clauses)
            .and_then(|_| window.update_item(WindowItem::Length, self.counters.length))
            .and_then(|_| window.update_item(WindowItem::Peak, self.counters.peak_length))
            .and_then(|_| window.update_item(WindowItem::Time, format!("{:.2?}", self.start.elapsed())))
            .and_then(|_| window.flush());

        if let Err(e) = drawn {
            log::warn!(target: crate::log::targets::FOLD, "Stats abandoned: {e}");
            self.window = None;
        }
    }
}
