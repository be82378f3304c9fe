//! Transfer orchestrator
//!
//! Sequences the copy, paste, import and export pipelines:
//!
//! - paste: clipboard read -> `before_paste` -> decode -> validate ->
//!   `after_paste` -> sink
//! - copy: source -> `before_copy` -> encode -> clipboard write ->
//!   `after_copy`
//! - import: file read -> grid decode -> validate
//! - export: `before_copy` -> grid encode -> file download -> `after_copy`
//!
//! A failure anywhere in a pipeline is logged, handed to
//! [`TransferHooks::on_error`] and returned. Validation failures are not
//! errors: the report is logged and returned alongside the data.

mod hooks;

pub use hooks::{NoHooks, TransferHooks};

use crate::codec::{delimited, grid};
use crate::config::TransferOptions;
use crate::error::{HookStage, PortError, TransferError, TransferResult};
use crate::models::{Column, TableSnapshot};
use crate::ports::{ClipboardPort, FilePort, TableAdapter};
use crate::validation::{DataValidator, ValidationReport};
use tracing::{debug, error, info, warn};

/// Decoded data together with its validation report
#[derive(Debug, Clone, PartialEq)]
pub struct Pasted {
    pub snapshot: TableSnapshot,
    pub report: ValidationReport,
}

fn hook_error(stage: HookStage) -> impl FnOnce(anyhow::Error) -> TransferError {
    move |source| TransferError::Hook { stage, source }
}

fn adapter_error<A: TableAdapter + ?Sized>(adapter: &A) -> impl FnOnce(PortError) -> TransferError {
    let name = adapter.name().to_string();
    move |source| TransferError::Adapter {
        adapter: name,
        source,
    }
}

/// Moves table data between adapters, the clipboard and files
pub struct TransferOrchestrator<C, F> {
    options: TransferOptions,
    hooks: Box<dyn TransferHooks>,
    validator: DataValidator,
    clipboard: C,
    files: F,
}

impl<C: ClipboardPort, F: FilePort> TransferOrchestrator<C, F> {
    /// Create an orchestrator with default options, no hooks and no rules
    pub fn new(clipboard: C, files: F) -> Self {
        Self {
            options: TransferOptions::default(),
            hooks: Box::new(NoHooks),
            validator: DataValidator::new(),
            clipboard,
            files,
        }
    }

    /// Replace the options; delimiters are checked first
    pub fn with_options(mut self, options: TransferOptions) -> TransferResult<Self> {
        self.options = options.checked()?;
        Ok(self)
    }

    pub fn with_hooks(mut self, hooks: impl TransferHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn with_validator(mut self, validator: DataValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn set_hooks(&mut self, hooks: impl TransferHooks + 'static) {
        self.hooks = Box::new(hooks);
    }

    pub fn options(&self) -> &TransferOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut TransferOptions {
        &mut self.options
    }

    pub fn validator(&self) -> &DataValidator {
        &self.validator
    }

    pub fn validator_mut(&mut self) -> &mut DataValidator {
        &mut self.validator
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn files(&self) -> &F {
        &self.files
    }

    /// Validate a snapshot with the registered rules
    pub fn validate(&self, snapshot: &TableSnapshot) -> ValidationReport {
        self.validator.validate(snapshot)
    }

    // ---- paste ----

    /// Read the clipboard and decode it against `columns`
    pub async fn paste_from_clipboard(&self, columns: &[Column]) -> TransferResult<Pasted> {
        let result = self.paste_pipeline(columns).await;
        self.observe("paste", result)
    }

    /// Paste the clipboard over the whole of `adapter`
    pub async fn paste_into<A: TableAdapter + ?Sized>(
        &self,
        adapter: &A,
        columns: &[Column],
    ) -> TransferResult<Pasted> {
        let result = async {
            let pasted = self.paste_pipeline(columns).await?;
            adapter
                .set_snapshot(pasted.snapshot.clone())
                .await
                .map_err(adapter_error(adapter))?;
            Ok::<_, TransferError>(pasted)
        }
        .await;
        self.observe("paste", result)
    }

    /// Paste the clipboard into the rows selected in `adapter`
    pub async fn paste_into_selection<A: TableAdapter + ?Sized>(
        &self,
        adapter: &A,
        columns: &[Column],
    ) -> TransferResult<Pasted> {
        let Some(selection) = adapter.selection() else {
            return Err(TransferError::unsupported(adapter.name(), "selection paste"));
        };

        let result = async {
            let pasted = self.paste_pipeline(columns).await?;
            selection
                .set_selected_snapshot(pasted.snapshot.clone())
                .await
                .map_err(adapter_error(adapter))?;
            Ok::<_, TransferError>(pasted)
        }
        .await;
        self.observe("paste", result)
    }

    async fn paste_pipeline(&self, columns: &[Column]) -> TransferResult<Pasted> {
        let payload = self.clipboard.read().await?;
        let payload = self
            .hooks
            .before_paste(payload)
            .await
            .map_err(hook_error(HookStage::BeforePaste))?;

        let snapshot = delimited::deserialize_payload(&payload, columns, &self.options);
        let report = self.check(&snapshot);

        self.hooks
            .after_paste(&snapshot)
            .await
            .map_err(hook_error(HookStage::AfterPaste))?;

        info!("Pasted {} rows from clipboard", snapshot.row_count());
        Ok(Pasted { snapshot, report })
    }

    // ---- copy ----

    /// Encode a snapshot and write it to the clipboard
    pub async fn copy_to_clipboard(&self, snapshot: TableSnapshot) -> TransferResult<()> {
        let result = self.copy_pipeline(snapshot).await;
        self.observe("copy", result)
    }

    /// Copy the whole of `adapter`
    pub async fn copy_from<A: TableAdapter + ?Sized>(&self, adapter: &A) -> TransferResult<()> {
        let result = async {
            let snapshot = adapter.get_snapshot().await.map_err(adapter_error(adapter))?;
            self.copy_pipeline(snapshot).await
        }
        .await;
        self.observe("copy", result)
    }

    /// Copy the rows selected in `adapter`
    pub async fn copy_selection_from<A: TableAdapter + ?Sized>(
        &self,
        adapter: &A,
    ) -> TransferResult<()> {
        let Some(selection) = adapter.selection() else {
            return Err(TransferError::unsupported(adapter.name(), "selection copy"));
        };

        let result = async {
            let snapshot = selection
                .get_selected_snapshot()
                .await
                .map_err(adapter_error(adapter))?;
            self.copy_pipeline(snapshot).await
        }
        .await;
        self.observe("copy", result)
    }

    async fn copy_pipeline(&self, snapshot: TableSnapshot) -> TransferResult<()> {
        let snapshot = self
            .hooks
            .before_copy(snapshot)
            .await
            .map_err(hook_error(HookStage::BeforeCopy))?;

        let payload = delimited::to_payload(&snapshot, &self.options);
        self.clipboard.write(&payload).await?;

        self.hooks
            .after_copy(&snapshot)
            .await
            .map_err(hook_error(HookStage::AfterCopy))?;

        info!("Copied {} rows to clipboard", snapshot.row_count());
        Ok(())
    }

    // ---- files ----

    /// Read a spreadsheet file and decode it against `columns`
    pub async fn import_from_file(&self, file: &str, columns: &[Column]) -> TransferResult<Pasted> {
        let result = self.import_pipeline(file, columns).await;
        self.observe("import", result)
    }

    /// Import a file over the whole of `adapter`
    pub async fn import_into<A: TableAdapter + ?Sized>(
        &self,
        adapter: &A,
        file: &str,
        columns: &[Column],
    ) -> TransferResult<Pasted> {
        let result = async {
            let pasted = self.import_pipeline(file, columns).await?;
            adapter
                .set_snapshot(pasted.snapshot.clone())
                .await
                .map_err(adapter_error(adapter))?;
            Ok::<_, TransferError>(pasted)
        }
        .await;
        self.observe("import", result)
    }

    async fn import_pipeline(&self, file: &str, columns: &[Column]) -> TransferResult<Pasted> {
        let sheet = self.files.import_from(file).await?;
        let snapshot = grid::from_grid(&sheet, columns, &self.options);
        let report = self.check(&snapshot);

        info!("Imported {} rows from {}", snapshot.row_count(), file);
        Ok(Pasted { snapshot, report })
    }

    /// Encode a snapshot as a sheet and offer it for download
    ///
    /// `filename` defaults to `options.default_filename`.
    pub async fn export_to_file(
        &self,
        snapshot: TableSnapshot,
        filename: Option<&str>,
    ) -> TransferResult<()> {
        let result = self.export_pipeline(snapshot, filename).await;
        self.observe("export", result)
    }

    /// Export the whole of `adapter`
    pub async fn export_from<A: TableAdapter + ?Sized>(
        &self,
        adapter: &A,
        filename: Option<&str>,
    ) -> TransferResult<()> {
        let result = async {
            let snapshot = adapter.get_snapshot().await.map_err(adapter_error(adapter))?;
            self.export_pipeline(snapshot, filename).await
        }
        .await;
        self.observe("export", result)
    }

    async fn export_pipeline(
        &self,
        snapshot: TableSnapshot,
        filename: Option<&str>,
    ) -> TransferResult<()> {
        let filename = filename.unwrap_or(self.options.default_filename.as_str());

        let snapshot = self
            .hooks
            .before_copy(snapshot)
            .await
            .map_err(hook_error(HookStage::BeforeCopy))?;

        let sheet = grid::to_grid(&snapshot, &self.options);
        self.files.export_to(&sheet, filename).await?;

        self.hooks
            .after_copy(&snapshot)
            .await
            .map_err(hook_error(HookStage::AfterCopy))?;

        info!("Exported {} rows to {}", snapshot.row_count(), filename);
        Ok(())
    }

    // ---- shared ----

    fn check(&self, snapshot: &TableSnapshot) -> ValidationReport {
        let report = self.validator.validate(snapshot);
        if !report.valid {
            warn!("Data validation failed with {} errors", report.error_count());
            for err in &report.errors {
                debug!("Validation error: {}", err);
            }
        }
        report
    }

    fn observe<T>(&self, operation: &str, result: TransferResult<T>) -> TransferResult<T> {
        if let Err(e) = &result {
            error!("Transfer {} failed: {}", operation, e);
            self.hooks.on_error(e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, ClipboardPayload, DataType, Row};
    use crate::ports::{MemoryClipboard, MemoryFilePort, MemoryTable};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name").with_type(DataType::String),
            Column::new("age", "Age").with_type(DataType::Number),
        ]
    }

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
        fail_before_paste: bool,
    }

    #[async_trait::async_trait(?Send)]
    impl TransferHooks for Recorder {
        async fn before_copy(&self, snapshot: TableSnapshot) -> anyhow::Result<TableSnapshot> {
            self.events.borrow_mut().push("before_copy".into());
            Ok(snapshot)
        }

        async fn after_copy(&self, _snapshot: &TableSnapshot) -> anyhow::Result<()> {
            self.events.borrow_mut().push("after_copy".into());
            Ok(())
        }

        async fn before_paste(&self, payload: ClipboardPayload) -> anyhow::Result<ClipboardPayload> {
            self.events.borrow_mut().push("before_paste".into());
            if self.fail_before_paste {
                anyhow::bail!("paste blocked");
            }
            Ok(payload)
        }

        fn on_error(&self, error: &TransferError) {
            self.events.borrow_mut().push(format!("on_error: {}", error));
        }
    }

    #[test]
    fn test_copy_writes_text_and_structured() {
        let orchestrator = TransferOrchestrator::new(MemoryClipboard::new(), MemoryFilePort::new());
        let snapshot = TableSnapshot::new(
            columns(),
            vec![Row::at(0).with("name", "Alice").with("age", 30.0)],
        );

        block_on(orchestrator.copy_to_clipboard(snapshot)).unwrap();

        let payload = orchestrator.clipboard().contents().unwrap();
        assert_eq!(payload.text, "Name\tAge\nAlice\t30");
        assert!(payload.structured.is_some());
    }

    #[test]
    fn test_hook_failure_reaches_on_error() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let orchestrator =
            TransferOrchestrator::new(MemoryClipboard::with_text("Name\tAge"), MemoryFilePort::new())
                .with_hooks(Recorder {
                    events: events.clone(),
                    fail_before_paste: true,
                });

        let err = block_on(orchestrator.paste_from_clipboard(&columns())).unwrap_err();
        assert!(matches!(
            err,
            TransferError::Hook {
                stage: HookStage::BeforePaste,
                ..
            }
        ));
        assert_eq!(
            *events.borrow(),
            vec![
                "before_paste".to_string(),
                "on_error: Hook 'beforePaste' failed: paste blocked".to_string(),
            ]
        );
    }

    #[test]
    fn test_unsupported_selection_skips_pipeline() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let orchestrator = TransferOrchestrator::new(MemoryClipboard::new(), MemoryFilePort::new())
            .with_hooks(Recorder {
                events: events.clone(),
                fail_before_paste: false,
            });
        let table = MemoryTable::new("plain", columns(), vec![]);

        let err = block_on(orchestrator.copy_selection_from(&table)).unwrap_err();
        assert!(err.is_unsupported());
        assert!(events.borrow().is_empty());
        assert!(orchestrator.clipboard().contents().is_none());
    }

    #[test]
    fn test_export_uses_default_filename_and_hooks() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let orchestrator = TransferOrchestrator::new(MemoryClipboard::new(), MemoryFilePort::new())
            .with_hooks(Recorder {
                events: events.clone(),
                fail_before_paste: false,
            });
        let snapshot = TableSnapshot::new(
            columns(),
            vec![Row::at(0).with("name", "Bob").with("age", 41.0)],
        );

        block_on(orchestrator.export_to_file(snapshot, None)).unwrap();

        let downloads = orchestrator.files().downloads();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].filename, "export.xlsx");
        assert_eq!(downloads[0].grid.cells[1][1], CellValue::Number(41.0));
        assert_eq!(*events.borrow(), vec!["before_copy", "after_copy"]);
    }
}
