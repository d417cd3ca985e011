//! The two relations of a compiled index.
//!
//! - `CANONICAL` holds one row per canonical formula: a negative id and the encoding of the formula.
//! - `NONCANONICAL` holds one row per trie node: a positive id, the symbol of the node, the id of the parent node (0 for children of the root), and the id of the canonical formula of the rule at the node (0 if the node holds no rule).
//!
//! Rows of `NONCANONICAL` are written parents first, so a forward pass in order of id only ever meets a parent it has already read.

use rusqlite::Connection;

/// Written in the place of an id for the root, or for a node without a rule.
pub const NONE: i64 = 0;

const SCHEMA: &str = "
CREATE TABLE CANONICAL (
    ID INTEGER NOT NULL,
    FORMULA VARCHAR(100) NOT NULL,
    PRIMARY KEY (ID)
);

CREATE TABLE NONCANONICAL (
    ID INTEGER NOT NULL,
    SYMBOL CHAR(1) NOT NULL,
    PARENT INTEGER NOT NULL,
    CANONICAL_ID INTEGER NOT NULL,
    PRIMARY KEY (ID)
);

CREATE INDEX NONCANONICAL_INDEX_1 ON NONCANONICAL (PARENT, SYMBOL);
";

pub const INSERT_CANONICAL: &str = "INSERT INTO CANONICAL (ID, FORMULA) VALUES (?1, ?2)";

pub const INSERT_NONCANONICAL: &str =
    "INSERT INTO NONCANONICAL (ID, SYMBOL, PARENT, CANONICAL_ID) VALUES (?1, ?2, ?3, ?4)";

/// Canonical formulas, from -1 downwards.
pub const SELECT_CANONICAL: &str = "SELECT ID, FORMULA FROM CANONICAL ORDER BY ID DESC";

/// Nodes, from 1 upwards.
pub const SELECT_NONCANONICAL: &str =
    "SELECT ID, SYMBOL, PARENT, CANONICAL_ID FROM NONCANONICAL ORDER BY ID ASC";

pub fn create(connection: &Connection) -> rusqlite::Result<()> {
    connection.execute_batch(SCHEMA)
}
