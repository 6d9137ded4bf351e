pub const ERRCTX_MARKUP: &'static str = "inside markup structure";
pub const ERRCTX_MARKUP_START: &'static str = "after left angle bracket '<'";
pub const ERRCTX_START_TAG: &'static str = "in start tag";
pub const ERRCTX_END_TAG: &'static str = "in end tag";
pub const ERRCTX_EMPTY_TAG: &'static str = "in empty tag";
pub const ERRCTX_ATTNAME: &'static str = "in attribute name of start tag";
pub const ERRCTX_ATTVAL: &'static str = "in attribute value";
pub const ERRCTX_COMMENT_START: &'static str = "after '<!-'";
pub const ERRCTX_PI_START: &'static str = "after '<?'";
pub const ERRCTX_PI: &'static str = "in processing instruction";
pub const ERRCTX_ENTITY_REF: &'static str = "in entity reference";
pub const ERRCTX_CHAR_REF: &'static str = "in character reference";
pub const ERRCTX_REF: &'static str = "inside reference";
