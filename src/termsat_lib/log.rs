/*!
Miscelanous items related to [logging](log).

Note, no log implementation is provided.
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [reduction](crate::procedures::reduce)
    pub const REDUCTION: &str = "reduction";

    /// Logs related to the [instance recognizer](crate::recognizer)
    pub const RECOGNIZER: &str = "recognizer";

    /// Logs related to [rule repositories](crate::rules)
    pub const REPOSITORY: &str = "repository";

    /// Logs related to the [indexer](crate::indexer)
    pub const INDEXER: &str = "indexer";

    /// Logs related to folding clauses into a [context](crate::context)
    pub const FOLD: &str = "fold";

    /// Logs related to reading DIMACS and rule files
    pub const PARSE: &str = "parse";
}
