//! Reading clauses from text.
//!
//! Literals are DIMACS literals: a non-zero integer, negative for a negated variable.
//! A DIMACS input is read as:
//!
//! - A preamble of comment lines (beginning `c`) and at most one problem line, `p cnf VARIABLES CLAUSES`.
//! - Clauses, as literals separated by whitespace and closed by `0`.
//!   A clause may span lines, and a line may hold several clauses.
//! - Reading stops at the end of input, or at a line beginning `%`.
//!
//! A problem line after the preamble is an error.
//! A clause count which differs from the problem line is noted, but is not an error.
//! Literals left open at the end of input are folded as a final clause.

use std::io::BufRead;

use crate::{
    context::Context,
    rules::RuleRepository,
    structures::formula::{Formula, VariableId},
    types::err::{ErrorKind, ParseError},
};

/// The literal of a DIMACS literal string, e.g. `-3` for the negation of variable 3.
pub fn literal_from_string(string: &str) -> Result<Formula, ParseError> {
    let trimmed = string.trim();
    let (negated, name) = match trimmed.strip_prefix('-') {
        Some(name) => (true, name),
        None => (false, trimmed),
    };

    let id: VariableId = match name.parse() {
        Ok(id) => id,
        Err(_) => return Err(ParseError::Literal(trimmed.to_owned())),
    };
    let variable = match Formula::variable(id) {
        Ok(variable) => variable,
        Err(_) => return Err(ParseError::Literal(trimmed.to_owned())),
    };

    match negated {
        true => Ok(Formula::negation(variable)),
        false => Ok(variable),
    }
}

/// Counts from reading a DIMACS input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DimacsSummary {
    /// The variable and clause counts of the problem line, if there was one.
    pub expected: Option<(usize, usize)>,

    /// Clauses folded.
    pub clauses: usize,
}

impl<R: RuleRepository> Context<R> {
    /// Folds the clause written as whitespace separated literals, without a closing `0`.
    pub fn clause_from_string(&mut self, string: &str) -> Result<(), ErrorKind> {
        let mut the_clause = vec![];
        for string_literal in string.split_whitespace() {
            the_clause.push(literal_from_string(string_literal)?);
        }
        self.add_clause(the_clause)
    }

    /// Folds every clause of a DIMACS input.
    pub fn read_dimacs(&mut self, mut reader: impl BufRead) -> Result<DimacsSummary, ErrorKind> {
        let mut buffer = String::with_capacity(1024);
        let mut clause_buffer: Vec<Formula> = Vec::new();
        let mut summary = DimacsSummary::default();
        let mut line_counter = 0;

        // first phase, read until the formula begins
        'preamble_loop: loop {
            buffer.clear();
            match reader.read_line(&mut buffer) {
                Ok(0) => break 'preamble_loop,
                Ok(_) => line_counter += 1,
                Err(_) => return Err(ParseError::Line(line_counter + 1).into()),
            }

            match buffer.trim_start().chars().next() {
                None | Some('c') => continue,

                Some('p') => {
                    if summary.expected.is_some() {
                        return Err(ParseError::MisplacedProblem(line_counter).into());
                    }
                    summary.expected = Some(problem_details(&buffer)?);
                    log::info!(target: crate::log::targets::PARSE,
                        "Expecting {:?} variables and clauses", summary.expected);
                }

                Some(_) => break 'preamble_loop,
            }
        }

        // second phase, the buffer holds the first line of the formula, if any
        'formula_loop: loop {
            match buffer.trim_start().chars().next() {
                None | Some('c') => {}
                Some('%') => break 'formula_loop,
                Some('p') => return Err(ParseError::MisplacedProblem(line_counter).into()),
                Some(_) => {
                    for item in buffer.split_whitespace() {
                        match item {
                            "0" => {
                                self.add_clause(std::mem::take(&mut clause_buffer))?;
                                summary.clauses += 1;
                            }
                            _ => clause_buffer.push(literal_from_string(item)?),
                        }
                    }
                }
            }

            buffer.clear();
            match reader.read_line(&mut buffer) {
                Ok(0) => break 'formula_loop,
                Ok(_) => line_counter += 1,
                Err(_) => return Err(ParseError::Line(line_counter + 1).into()),
            }
        }

        if !clause_buffer.is_empty() {
            log::warn!(target: crate::log::targets::PARSE, "Final clause without a closing 0");
            self.add_clause(clause_buffer)?;
            summary.clauses += 1;
        }

        if let Some((_, expected_clauses)) = summary.expected {
            if expected_clauses != summary.clauses {
                log::warn!(target: crate::log::targets::PARSE,
                    "Expected {expected_clauses} clauses, read {}", summary.clauses);
            }
        }

        Ok(summary)
    }
}

fn problem_details(line: &str) -> Result<(usize, usize), ParseError> {
    let mut details = line.split_whitespace();
    match (details.next(), details.next()) {
        (Some("p"), Some("cnf")) => {}
        _ => return Err(ParseError::ProblemSpecification),
    }

    let variable_count: usize = match details.next().map(str::parse) {
        Some(Ok(count)) => count,
        _ => return Err(ParseError::ProblemSpecification),
    };

    let clause_count: usize = match details.next().map(str::parse) {
        Some(Ok(count)) => count,
        _ => return Err(ParseError::ProblemSpecification),
    };

    Ok((variable_count, clause_count))
}
