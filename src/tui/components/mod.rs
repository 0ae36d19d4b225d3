//! # TUI Components
//!
//! Stateless components receive everything as props:
//! - `TitleBar`: top status line
//! - `Message`: one transcript entry
//!
//! Stateful components keep local state and handle `TuiEvent`s:
//! - `InputBox`: single-line input with send control
//! - `MessageList`: scrollable transcript with layout caching
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single entry renderer)
//! ├── message_list.rs  (Scrollable transcript)
//! └── input_box/       (Text input and cursor handling)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub use input_box::{InputBox, InputEvent};
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
