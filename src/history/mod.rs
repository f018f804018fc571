pub mod panel;

pub use panel::HistoryPanel;
