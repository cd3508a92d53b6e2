pub mod error;
pub mod io;
pub mod memo;
pub mod model;
pub mod onehot;
pub mod pair;
pub mod policy;
pub mod predictor;
