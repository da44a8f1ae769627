//! File generation job
//!
//! Resolves the settlement date, generates the file, persists it, and only
//! then advances the file sequence. A failure before the advance leaves the
//! counter where it was, so the same request can simply be retried.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::calendar::BusinessDayCalculator;
use crate::domain::{Direction, GeneratedFile, GeneratedFileSummary, PaymentEntry};
use crate::error::AppError;
use crate::nacha::{NachaEncoder, ValidationReport};

use super::repository::FileRepository;

/// A request to produce one NACHA file.
#[derive(Debug, Clone, Serialize)]
pub struct FileRequest {
    pub direction: Direction,
    /// Date the caller asked for; resolved against the calendar
    pub requested_date: NaiveDate,
    pub entries: Vec<PaymentEntry>,
}

impl FileRequest {
    pub fn new(
        direction: Direction,
        requested_date: NaiveDate,
        entries: Vec<PaymentEntry>,
    ) -> Self {
        Self {
            direction,
            requested_date,
            entries,
        }
    }
}

/// What a completed run hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRunResult {
    pub file: GeneratedFile,
    /// Sequence number the next file will carry
    pub next_sequence: u8,
    pub warnings: Vec<String>,
}

/// Orchestrates calendar, encoder and repository for one originator.
pub struct FileGenerationJob {
    calendar: BusinessDayCalculator,
    encoder: Arc<NachaEncoder>,
    repository: Arc<dyn FileRepository>,
}

impl FileGenerationJob {
    pub fn new(
        calendar: BusinessDayCalculator,
        encoder: Arc<NachaEncoder>,
        repository: Arc<dyn FileRepository>,
    ) -> Self {
        Self {
            calendar,
            encoder,
            repository,
        }
    }

    /// Settlement date for a request.
    ///
    /// Debits settle on the requested date or the next business day. Credits
    /// settle two business days after that debit date.
    pub fn effective_date(
        &self,
        direction: Direction,
        requested: NaiveDate,
    ) -> Result<NaiveDate, AppError> {
        let debit_date = self.calendar.resolve_effective_date(requested)?;
        let date = match direction {
            Direction::Debit => debit_date,
            Direction::Credit => self.calendar.resolve_credit_effective_date(debit_date)?,
        };
        Ok(date)
    }

    /// Generate, persist, then advance the sequence.
    pub fn run(&self, request: &FileRequest) -> Result<FileRunResult, AppError> {
        if request.entries.is_empty() {
            return Err(AppError::InvalidRequest(
                "no payment entries to include in the file".to_string(),
            ));
        }

        let effective_date = self.effective_date(request.direction, request.requested_date)?;
        if effective_date != request.requested_date {
            tracing::info!(
                requested = %request.requested_date,
                effective = %effective_date,
                direction = %request.direction,
                "Moved effective date to a business day"
            );
        }

        let file = self
            .encoder
            .generate(&request.entries, effective_date, request.direction)?;

        let report = self.encoder.validate(&file.content);
        if !report.valid {
            tracing::warn!(
                filename = %file.filename,
                errors = ?report.errors,
                "Generated file failed structural validation"
            );
        }

        if let Err(e) = self.repository.save(&file) {
            tracing::error!(
                filename = %file.filename,
                error = %e,
                "Failed to persist NACHA file; sequence not advanced"
            );
            return Err(e.into());
        }

        let next_sequence = self.encoder.advance_sequence()?;

        tracing::info!(
            filename = %file.filename,
            effective_date = %file.effective_date,
            entry_count = file.entry_count,
            total = %file.total_amount,
            next_sequence,
            "NACHA file ready"
        );

        Ok(FileRunResult {
            file,
            next_sequence,
            warnings: report.errors,
        })
    }

    pub fn stored(&self) -> Result<Vec<GeneratedFileSummary>, AppError> {
        Ok(self.repository.list()?)
    }

    /// Re-check a stored file before it is sent: structure and content digest.
    pub fn validate_stored(&self, filename: &str) -> Result<ValidationReport, AppError> {
        let file = self.repository.get(filename)?;
        let mut report = self.encoder.validate(&file.content);
        if !file.verify_digest() {
            report.valid = false;
            report
                .errors
                .push("Content does not match its recorded SHA-256 digest".to_string());
        }
        Ok(report)
    }

    /// Record that a stored file was handed to the bank.
    ///
    /// Files that no longer validate are refused so a tampered file is never
    /// recorded as sent.
    pub fn mark_transmitted(&self, filename: &str) -> Result<GeneratedFileSummary, AppError> {
        let report = self.validate_stored(filename)?;
        if !report.valid {
            return Err(AppError::InvalidRequest(format!(
                "{filename} failed validation: {}",
                report.errors.join("; ")
            )));
        }
        let summary = self.repository.mark_transmitted(filename)?;
        tracing::info!(filename, "NACHA file transmitted");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cents, OriginatorProfile, Party, RoutingNumber};
    use crate::nacha::{InMemorySequenceStore, SequentialTraceSource};
    use crate::workflow::repository::{InMemoryFileRepository, RepositoryError};

    struct FailingRepository;

    impl FileRepository for FailingRepository {
        fn save(&self, _file: &GeneratedFile) -> Result<(), RepositoryError> {
            Err(RepositoryError::Io {
                path: "/unavailable".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            })
        }

        fn get(&self, filename: &str) -> Result<GeneratedFile, RepositoryError> {
            Err(RepositoryError::NotFound(filename.to_string()))
        }

        fn list(&self) -> Result<Vec<GeneratedFileSummary>, RepositoryError> {
            Ok(Vec::new())
        }

        fn mark_transmitted(
            &self,
            filename: &str,
        ) -> Result<GeneratedFileSummary, RepositoryError> {
            Err(RepositoryError::NotFound(filename.to_string()))
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn encoder() -> Arc<NachaEncoder> {
        let profile =
            OriginatorProfile::try_new("091000019", "123456789", "ACME CORP", "1234567890")
                .unwrap();
        Arc::new(NachaEncoder::new(
            profile,
            Arc::new(InMemorySequenceStore::new()),
            Arc::new(SequentialTraceSource::new(0)),
        ))
    }

    fn request(direction: Direction, requested: NaiveDate) -> FileRequest {
        let entry = PaymentEntry::new(
            Party::new(RoutingNumber::parse("021000021").unwrap(), "1001", "A1", "PAYER"),
            Party::new(RoutingNumber::parse("011000015").unwrap(), "2002", "B2", "PAYEE"),
            Cents::new(10000),
        )
        .unwrap();
        FileRequest::new(direction, requested, vec![entry])
    }

    fn calendar() -> BusinessDayCalculator {
        BusinessDayCalculator::for_years([2026]).unwrap()
    }

    fn job() -> (FileGenerationJob, Arc<InMemoryFileRepository>) {
        let repository = Arc::new(InMemoryFileRepository::new());
        (
            FileGenerationJob::new(calendar(), encoder(), repository.clone()),
            repository,
        )
    }

    #[test]
    fn test_debit_effective_date_rolls_off_weekend() {
        let (job, _) = job();
        let date = job.effective_date(Direction::Debit, ymd(2026, 10, 17)).unwrap();
        assert_eq!(date, ymd(2026, 10, 19));
    }

    #[test]
    fn test_credit_effective_date_two_business_days_later() {
        let (job, _) = job();
        // Saturday -> Monday debit -> Wednesday credit
        let date = job.effective_date(Direction::Credit, ymd(2026, 10, 17)).unwrap();
        assert_eq!(date, ymd(2026, 10, 21));
    }

    #[test]
    fn test_run_persists_and_advances() {
        let repository = Arc::new(InMemoryFileRepository::new());
        let encoder = encoder();
        let job = FileGenerationJob::new(calendar(), encoder.clone(), repository.clone());

        let result = job.run(&request(Direction::Debit, ymd(2026, 10, 20))).unwrap();

        assert_eq!(result.file.file_id_modifier, 1);
        assert_eq!(result.next_sequence, 2);
        assert!(result.warnings.is_empty());
        assert_eq!(encoder.current_sequence().unwrap(), 2);
        assert_eq!(repository.list().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_save_leaves_sequence_untouched() {
        let encoder = encoder();
        let job = FileGenerationJob::new(calendar(), encoder.clone(), Arc::new(FailingRepository));

        let result = job.run(&request(Direction::Debit, ymd(2026, 10, 20)));

        assert!(matches!(result, Err(AppError::Repository(_))));
        assert_eq!(encoder.current_sequence().unwrap(), 1);
    }

    #[test]
    fn test_empty_request_rejected() {
        let (job, _) = job();
        let request = FileRequest::new(Direction::Credit, ymd(2026, 10, 20), Vec::new());
        let err = job.run(&request).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_mark_transmitted_after_run() {
        let (job, repository) = job();
        let result = job.run(&request(Direction::Credit, ymd(2026, 10, 20))).unwrap();
        assert!(!result.file.transmitted);

        let report = job.validate_stored(&result.file.filename).unwrap();
        assert!(report.valid, "{:?}", report.errors);

        let summary = job.mark_transmitted(&result.file.filename).unwrap();
        assert!(summary.transmitted);
        assert!(repository.get(&result.file.filename).unwrap().transmitted);
        assert!(job.stored().unwrap()[0].transmitted);
    }

    #[test]
    fn test_tampered_file_not_marked_transmitted() {
        let (job, repository) = job();
        let mut file = job
            .run(&request(Direction::Debit, ymd(2026, 10, 20)))
            .unwrap()
            .file;
        file.filename = "ACH_DR_20261020_TAMPERED.txt".to_string();
        file.content = file.content.replacen("ACME CORP", "EVIL CORP", 1);
        repository.save(&file).unwrap();

        let report = job.validate_stored(&file.filename).unwrap();
        assert!(!report.valid);

        let err = job.mark_transmitted(&file.filename).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert!(!repository.get(&file.filename).unwrap().transmitted);
    }

    #[test]
    fn test_mark_unknown_file() {
        let (job, _) = job();
        let err = job.mark_transmitted("ACH_CR_20261020_000000.txt").unwrap_err();
        assert!(matches!(err, AppError::Repository(RepositoryError::NotFound(_))));
        assert!(err.is_client_error());
    }
}
