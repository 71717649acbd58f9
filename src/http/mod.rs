mod client;
mod models;
mod transport;

pub use client::HttpTransport;
pub use models::{
    ContactMessage, ContactResponse, HealthResponse, LoginRequest, LoginResponse,
    PredictResponse, PredictUpload, RankedClass, UserRecord,
};
pub use transport::{AccountTransport, PredictionTransport, TransportError};
