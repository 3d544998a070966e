pub mod coinglass_client;
pub mod envelope;
pub mod liquidation_response;
pub mod long_short_response;
pub mod ohlc_response;
pub mod transport;
pub mod wire;

pub use coinglass_client::{ApiError, ClientSettings, CoinglassClient, RetryPolicy};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport, TransportError};
