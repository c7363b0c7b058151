pub mod algorithms;
pub mod pipeline;
pub mod service;

pub use algorithms::kmeans::{kmeans, ClusteringError, KmeansResult};
pub use pipeline::outcome::{DegradeCause, RejectReason, SummaryOutcome};
pub use pipeline::Summarizer;
pub use service::{
    HealthStatus, MethodInfo, SummarizeError, SummarizeRequest, SummarizeResponse,
    SummarizeService, SummaryMethod,
};
