use teal_asm::OnComplete;

use crate::program::Teal;

use super::{collect_vulnerable_paths, returns_approval, AbstractDetector, DetectorReport};

/// Paths approving an `UpdateApplication` transaction.
///
/// A path is reported when every block on it may execute with
/// `txn OnCompletion == UpdateApplication` and the path ends in an
/// approving `return`. Applications reachable this way can have their
/// programs replaced.
#[derive(Debug)]
pub struct CanUpdate;

impl AbstractDetector for CanUpdate {
    fn name(&self) -> &'static str {
        "can-update"
    }

    fn description(&self) -> &'static str {
        "Paths that approve an UpdateApplication transaction"
    }

    fn detect(&self, teal: &Teal) -> DetectorReport {
        let paths = collect_vulnerable_paths(
            teal,
            &|teal, block| {
                teal.block(block)
                    .context()
                    .on_completion()
                    .map_or(true, |actions| {
                        actions.contains(&OnComplete::UpdateApplication)
                    })
            },
            &returns_approval,
        );
        DetectorReport {
            check: self.name().to_string(),
            description: self.description().to_string(),
            paths,
        }
    }
}
