mod normalizer;
mod ohlcv;
mod sequence_model;

pub use normalizer::{NormalizedWindow, Scale, fit_transform, inverse_transform};
pub use ohlcv::{OhlcRecord, PriceSeries};
pub use sequence_model::{
    DenseLayer, LstmCell, LstmLayer, LstmModel, ModelHandle, SequenceModel, Serialized,
    StatefulModel,
};
