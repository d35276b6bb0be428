pub mod identifier;

pub use identifier::{
    normalize, CharacterPolicy, IdentifierError, MatchMode, NormalizedIdentifier,
    ValidationConfig,
};
