use crate::api::Registry;
use crate::model::Provenance;
use crate::parser::{ErrorKind, ParseError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Check `requires` then `conflicts` of every explicitly supplied option, in declaration order.
///
/// A requirement is met by an explicit or config value; a conflict only arises between explicit values.
/// `provenances` is aligned with the registry's options.
pub(crate) fn check_dependencies(
    registry: &Registry,
    provenances: &[Provenance],
) -> Result<(), ParseError> {
    let supplied = |name: &str, least: Provenance| {
        registry
            .position(name)
            .map_or(false, |index| provenances[index] >= least)
    };
    let explicit = || {
        registry
            .options()
            .iter()
            .zip(provenances.iter())
            .filter(|(_, provenance)| **provenance == Provenance::Explicit)
            .map(|(spec, _)| spec)
    };

    for spec in explicit() {
        let missing: Vec<&str> = spec
            .requires
            .iter()
            .filter(|name| !supplied(name.as_str(), Provenance::Config))
            .map(String::as_str)
            .collect();

        if !missing.is_empty() {
            #[cfg(feature = "tracing_debug")]
            debug!("Option '{}' is missing {missing:?}.", spec.canonical());
            return Err(ParseError::new(ErrorKind::RequireNotProvided)
                .with("arg", spec.canonical())
                .with("missing_args", missing.join(", ")));
        }
    }

    for spec in explicit() {
        let present: Vec<&str> = spec
            .conflicts
            .iter()
            .filter(|name| supplied(name.as_str(), Provenance::Explicit))
            .map(String::as_str)
            .collect();

        if !present.is_empty() {
            #[cfg(feature = "tracing_debug")]
            debug!("Option '{}' conflicts with {present:?}.", spec.canonical());
            return Err(ParseError::new(ErrorKind::ConflictIsProvided)
                .with("arg", spec.canonical())
                .with("conflict_args", present.join(", ")));
        }
    }

    Ok(())
}
