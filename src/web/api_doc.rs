use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(super::api::health::health, super::api::scan::scan),
    components(
        schemas(
            super::api::error::ErrorResponse,
            super::api::health::HealthResponse,
            super::api::scan::ScanQuery,
            crate::astro::Equatorial,
            crate::astro::Horizontal,
            crate::astro::ZenithFrame,
            crate::observer::Observer,
            crate::scan::FrameDisplay,
            crate::scan::SkyReport,
            crate::target::CelestialTarget,
            crate::target::TargetDetail,
            crate::target::TargetKind,
        )
    ),
    info(
        title = "Zenith Scan API",
        description = "Ranks celestial objects by angular distance from the observer's zenith",
        version = "0.1.0"
    ),
    tags(
        (name = "scan", description = "Sky scanning"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
