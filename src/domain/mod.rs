// Domain types and value objects
mod candle;
mod ticker;

// Re-export commonly used types to the world
pub use candle::Candle;
pub use ticker::Ticker;
