use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter, register_int_counter_vec,
    Histogram, HistogramVec, IntCounter, IntCounterVec,
};

lazy_static! {
    /// Duration of feed page builds by outcome (ok, retrieval_error, consistency_error).
    pub static ref FEED_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feed_request_duration_seconds",
        "Feed page build duration segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register feed_request_duration_seconds");

    /// Total feed page builds by outcome.
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Total feed page builds segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register feed_request_total");

    /// Pages whose slice ran past the newest post and pulled the most recent rows.
    pub static ref FEED_WRAPAROUND_TOTAL: IntCounter = register_int_counter!(
        "feed_wraparound_total",
        "Feed pages that wrapped around the end of the post list"
    )
    .expect("failed to register feed_wraparound_total");

    /// Posts returned per successful page.
    pub static ref FEED_PAGE_POSTS: Histogram = register_histogram!(
        "feed_page_posts",
        "Number of posts returned per feed page",
        vec![0.0, 1.0, 3.0, 6.0, 9.0, 12.0, 18.0, 36.0]
    )
    .expect("failed to register feed_page_posts");
}
