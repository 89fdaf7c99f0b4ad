/// Errors raised while constructing or validating the shared domain types.
///
/// These are deliberately narrow — most validation in this system happens
/// one layer down (`hbk-format`, `hbk-zip`) or one layer up (`help-index`).
/// This crate only rejects shapes that can never be meaningful, such as a
/// version string that isn't a dotted quadruple.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    /// A version string did not parse as four dot-separated non-negative
    /// integers (e.g. `"8.3.27.1989"`).
    #[error("invalid version string: {raw:?}")]
    InvalidVersion { raw: String },
}
