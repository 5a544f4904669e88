use anyhow::{Context, Result};
use tracing::info;
use uuid::Uuid;

use surveybar_topbar::{ResolverTable, TopbarConfig, TopbarSettings};

mod fixture;

use fixture::Fixture;

fn main() -> Result<()> {
    surveybar_observability::init();

    let path = std::env::args()
        .nth(1)
        .context("usage: surveybar-preview <fixture.json>")?;

    let settings = TopbarSettings::from_env().context("reading SURVEYBAR_* settings")?;

    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let fixture = Fixture::from_json(&raw).with_context(|| format!("parsing {path}"))?;

    let render_id = Uuid::now_v7();
    let span = tracing::info_span!("render", %render_id, fixture = %path);
    let _guard = span.enter();

    let collaborators = fixture.collaborators(&settings)?;
    let table = ResolverTable::standard(&collaborators, &settings);
    let config = TopbarConfig::from_view_context(&fixture.context);

    info!(
        view = config.view_name(),
        left = config.left_side_view(),
        right = config.right_side_view(),
        "resolving topbar"
    );

    let resolved = config.resolve_all(&table).context("resolving topbar data")?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);

    Ok(())
}
