use crate::Result;
use crate::fact::{FactMatch, FactSet};

/// The matching capability the scanner drives.
///
/// `find_all` searches `text` with the composite pattern for `facts` and
/// returns every match in text order. Implementations must be `Sync` to be
/// shared by the coordinator's workers.
pub trait MatchEngine {
    fn find_all(&self, facts: FactSet, text: &str) -> Result<Vec<FactMatch>>;
}

impl<E: MatchEngine + ?Sized> MatchEngine for &E {
    fn find_all(&self, facts: FactSet, text: &str) -> Result<Vec<FactMatch>> {
        (**self).find_all(facts, text)
    }
}
