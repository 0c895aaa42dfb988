//parser options, every field has a default matching the plain language rules

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    // prescan `fn` headers so calls may name later functions
    pub forward_references: bool,
    pub boolean_conditions: bool,
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            forward_references: false,
            boolean_conditions: true,
            max_depth: 256,
        }
    }
}
