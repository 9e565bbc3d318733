use anyhow::{Context, Result};

use crate::collector::{collect_license_information, DependencySet};
use crate::config::CheckerOptions;
use crate::policy::{get_license_violations, ignore_licenses, override_licenses, Violation};
use crate::report::{get_sorted_license_information, write_license_information};

/// Result of one audit run: the report artifact for the host to publish
/// plus the violations routed to its diagnostic channels.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    /// Artifact name the host should emit the content under.
    pub filename: String,
    pub content: String,
    /// Violations for the host's error list (`emit_error = true`).
    pub errors: Vec<Violation>,
    /// Violations for the host's warning list (`emit_error = false`).
    pub warnings: Vec<Violation>,
}

impl AuditOutcome {
    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.errors.iter().chain(self.warnings.iter())
    }
}

/// The license pipeline. The host constructs one checker per build run and
/// calls [`run`](Self::run) once with the build's complete dependency set.
pub struct LicenseChecker {
    options: CheckerOptions,
}

impl LicenseChecker {
    pub fn new(options: CheckerOptions) -> Self {
        Self { options }
    }

    /// Drive the full pipeline. Stage order is fixed: collect, ignore,
    /// override, violation check, sort, serialize. Overrides see the
    /// post-ignore map and the violation check sees the post-override map.
    ///
    /// Violations are data, not failures; the only error this returns is a
    /// writer failure, in which case no artifact exists.
    pub fn run(&self, dependencies: &DependencySet) -> Result<AuditOutcome> {
        let options = &self.options;

        let collected = collect_license_information(dependencies, &options.filter);
        let remaining = ignore_licenses(&collected, &options.ignore);
        let finalized = override_licenses(&remaining, &options.overrides);

        let violations = get_license_violations(&finalized, options.allow.as_ref());

        let sorted = get_sorted_license_information(&finalized);
        let content = write_license_information(options.writer.as_ref(), &sorted)
            .with_context(|| {
                format!(
                    "Failed to serialize license report '{}'",
                    options.output_filename
                )
            })?;

        let (errors, warnings) = if options.emit_error {
            (violations, Vec::new())
        } else {
            (Vec::new(), violations)
        };

        Ok(AuditOutcome {
            filename: options.output_filename.clone(),
            content,
            errors,
            warnings,
        })
    }
}
