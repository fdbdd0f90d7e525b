pub mod calendar;
pub mod collector;
pub mod config;
pub mod metrics;
pub mod organizer;
pub mod pacing;
pub mod pipeline;
pub mod providers;
pub mod region;
pub mod resolver;
pub mod testing;

pub use calendar::{
    Artist, Attraction, AttractionId, ConcertCalendar, Event, MonthBucket, MONTH_NAMES,
};
pub use collector::EventCollector;
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServerConfig,
};
pub use organizer::{organize, OrganizedEvents, DEFAULT_MAX_ITERATIONS};
pub use pacing::{Pacer, DEFAULT_REQUEST_DELAY};
pub use pipeline::{
    ConcertPipeline, PipelineConfig, PipelineError, PipelineRequest,
};
pub use providers::{
    AccessToken, MusicProvider, ProviderError, SpotifyClient, SpotifyConfig, TicketingProvider,
    TicketmasterClient, TicketmasterConfig, MAX_TOP_ARTISTS,
};
pub use region::{normalize_region, REGION_CODES};
pub use resolver::ArtistResolver;
