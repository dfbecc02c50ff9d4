use teal_asm::OnComplete;

use crate::program::Teal;

use super::{collect_vulnerable_paths, returns_approval, AbstractDetector, DetectorReport};

/// Paths approving a `DeleteApplication` transaction.
#[derive(Debug)]
pub struct CanDelete;

impl AbstractDetector for CanDelete {
    fn name(&self) -> &'static str {
        "can-delete"
    }

    fn description(&self) -> &'static str {
        "Paths that approve a DeleteApplication transaction"
    }

    fn detect(&self, teal: &Teal) -> DetectorReport {
        let paths = collect_vulnerable_paths(
            teal,
            &|teal, block| {
                teal.block(block)
                    .context()
                    .on_completion()
                    .map_or(true, |actions| {
                        actions.contains(&OnComplete::DeleteApplication)
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
