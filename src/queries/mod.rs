pub mod dashboard;

pub use dashboard::{
    latest_indicator_readings, latest_recommendation, pair_dashboard, pair_exists, pair_quote,
    IndicatorReadingView, PairDashboard, PairQuote, RecommendationView,
};
