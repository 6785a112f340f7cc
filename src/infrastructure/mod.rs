pub mod desktop;
pub mod js_executor;
pub mod keyboard;

pub use desktop::{ClockApp, ClockSession};
pub use js_executor::{JsExecutor, WaitOptions};
pub use keyboard::KeyboardNavigator;
#[cfg(test)]
pub use keyboard::RecordingNavigator;
