//! Dataset files, settings and publishing for the release almanac tools.

pub mod dataset;
pub mod error;
pub mod index;
pub mod publish;
pub mod settings;
pub mod store;

pub use dataset::{Dataset, ResultsWriter, list_source_files, load_completed, load_pending_titles};
pub use error::{PublishError, SettingsError, StoreError};
pub use index::{INDEX_FILE, update_index};
pub use settings::{Overrides, Settings, SettingSource, settings_path};
pub use store::{LoadOutcome, load_json_array, load_or_empty, write_json_atomic};
