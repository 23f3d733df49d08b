use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::config::Config;
use crate::data::export::{ExportFormat, export_dataset, resolve_filename};
use crate::data::filter::{FilterSpec, Operation, OperationType};
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::error::SieveError;
use crate::store::DatasetStore;

/// Result of one background load.
pub type LoadOutcome = Result<Dataset, SieveError>;

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Raw filter form input, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    pub primary_column: String,
    /// Comma-separated.
    pub operation_columns: String,
    pub operation_type: OperationType,
    pub operation: Operation,
}

#[derive(Debug, Clone, Default)]
pub struct ExportForm {
    pub open: bool,
    pub filename: String,
    pub format: ExportFormat,
}

/// One-line message shown in the top bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Original and filtered datasets.
    pub store: DatasetStore,

    pub filter_form: FilterForm,
    pub export_form: ExportForm,

    /// File currently shown (or being loaded).
    pub source: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,

    /// Blocking alert; the UI shows it modally until dismissed.
    pub alert: Option<String>,

    /// Pending background load, if any.
    pending_load: Option<Receiver<LoadOutcome>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: DatasetStore::new(),
            filter_form: FilterForm::default(),
            export_form: ExportForm::default(),
            source: None,
            status: None,
            alert: None,
            pending_load: None,
        }
    }

    /// Whether a file loading operation is in progress.
    pub fn loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Start loading `path` on a background thread.
    ///
    /// Only one load may be outstanding; further requests are ignored
    /// until it completes.
    pub fn begin_load(&mut self, path: PathBuf) {
        if self.loading() {
            log::warn!("Ignoring load of {}: another load is in progress", path.display());
            return;
        }
        log::info!("Loading {}", path.display());

        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        thread::spawn(move || {
            // The receiver is gone only if the app has shut down.
            let _ = tx.send(load_source(&worker_path));
        });

        self.source = Some(path);
        self.status = Some(Status::Info("Loading…".to_string()));
        self.pending_load = Some(rx);
    }

    /// Check the pending load and ingest its result once available.
    pub fn poll_load(&mut self) {
        let Some(rx) = &self.pending_load else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(SieveError::SourceLoad {
                path: self.source_label(),
                message: "loader thread exited without a result".to_string(),
            }),
        };
        self.pending_load = None;
        self.finish_load(outcome);
    }

    /// Ingest a finished load. A failure leaves an empty dataset behind.
    pub fn finish_load(&mut self, outcome: LoadOutcome) {
        match outcome {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.len(),
                    dataset.columns()
                );
                self.store.load(dataset);
                self.status = None;
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.store.clear();
                self.status = Some(Status::Error(format!("Error: {e}")));
            }
        }
    }

    /// Rebuild the filter from the form and re-filter the original dataset.
    pub fn apply_filter(&mut self) {
        let form = &self.filter_form;
        let result = FilterSpec::from_input(
            &form.primary_column,
            &form.operation_columns,
            form.operation_type,
            form.operation,
        )
        .and_then(|spec| {
            log::debug!("Applying filter {spec:?}");
            self.store.apply(&spec)
        });

        match result {
            Ok(n) => {
                log::info!("{n} of {} rows match", self.store.original().len());
                // A load error stays visible until the next load.
                if matches!(self.status, Some(Status::Info(_))) {
                    self.status = None;
                }
            }
            Err(e) => {
                let e = SieveError::from(e);
                log::warn!("Rejected filter: {e}");
                self.alert = Some(e.to_string());
            }
        }
    }

    /// Write the filtered dataset using the export form's settings.
    pub fn export(&mut self) {
        let result = resolve_filename(&self.export_form.filename, &self.config.default_filename)
            .and_then(|name| {
                export_dataset(
                    self.store.filtered(),
                    &self.config.export_dir,
                    &name,
                    self.export_form.format,
                )
            });

        match result {
            Ok(path) => {
                self.status = Some(Status::Info(format!("Saved {}", path.display())));
                self.export_form.open = false;
            }
            Err(e) => {
                let e = SieveError::from(e);
                log::error!("{e}");
                self.status = Some(Status::Error(format!("Error: {e}")));
            }
        }
    }

    fn source_label(&self) -> String {
        self.source
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

fn load_source(path: &Path) -> LoadOutcome {
    load_file(path).map_err(|e| SieveError::SourceLoad {
        path: path.display().to_string(),
        message: format!("{e:#}"),
    })
}
