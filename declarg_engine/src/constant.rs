pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const HELP_MESSAGE: &str = "Show this help message and exit.";
pub(crate) const TERMINATOR: &str = "--";
pub(crate) const NEGATION_PREFIX: &str = "no-";
pub(crate) const SUB_CMD_KEY: &str = "sub_cmd";
pub(crate) const MEMORY_SOURCE: &str = "<memory>";
