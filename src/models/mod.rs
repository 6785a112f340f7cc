pub mod alarm;
pub mod book;
pub mod key_event;
pub mod loaders;
pub mod section;

pub use alarm::{AlarmSpec, SNOOZE_OPTIONS, SOUND_OPTIONS};
pub use book::{BookRecord, RawRow};
pub use key_event::{KeyEvent, NavigationPlan};
pub use loaders::{load_job, JobFile};
pub use section::Section;
