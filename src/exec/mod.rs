mod dispatch;

pub use dispatch::Dispatcher;
