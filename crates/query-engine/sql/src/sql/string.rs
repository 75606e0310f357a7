//! Type definitions of a low-level SQL string representation.

/// A SQL statement text together with the parameters it refers to.
#[derive(Debug, PartialEq, Eq)]
pub struct SQL {
    pub sql: String,
    pub params: Vec<Param>,
    /// for internal use and tests only
    pub param_index: u64,
}

impl Default for SQL {
    fn default() -> Self {
        Self::new()
    }
}

/// A parameter for a parameterized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// A literal string
    String(String),
    /// A named query parameter, supplied when the query is executed.
    Variable(String),
    /// A positional query parameter, supplied when the query is executed.
    Positional(u32),
}

impl SQL {
    pub fn new() -> SQL {
        SQL {
            sql: String::new(),
            params: vec![],
            param_index: 0,
        }
    }

    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append a quoted identifier. Embedded quotes are doubled.
    pub fn append_identifier(&mut self, sql: &str) {
        self.sql.push('"');
        self.sql.push_str(&sql.replace('"', "\"\""));
        self.sql.push('"');
    }

    pub fn append_param(&mut self, param: Param) {
        self.param_index += 1;
        self.sql.push_str(format!("${}", self.param_index).as_str());
        self.params.push(param);
    }
}
