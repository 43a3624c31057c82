//! Built-in verification flows for the Lotostats UI
//!
//! The three flows run in order and share one page: the first loads the
//! app, the later ones interact with the state it left behind.

use std::time::Duration;

use crate::locator::Locator;
use crate::scenario::Scenario;

/// Sample values the flows exercise against live application data.
///
/// These reflect what the current dataset is known to contain (a past game
/// number, a backtest tier that always has hits); override them from the
/// command line when the dataset changes.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub game_number: String,
    pub backtest_tier: String,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            game_number: "3000".to_string(),
            backtest_tier: "11 Pontos".to_string(),
        }
    }
}

/// Names of the built-in flows, in execution order.
pub const FLOW_NAMES: [&str; 3] = ["initial_load", "backtest", "search"];

/// All flows, in execution order.
pub fn all(fixtures: &Fixtures) -> Vec<Scenario> {
    vec![
        initial_load(),
        generate_backtest(fixtures),
        search_game(fixtures),
    ]
}

/// The flows up to and including `name`.
///
/// Later flows depend on the page state earlier ones leave behind, so a
/// single flow always runs together with its predecessors.
pub fn up_to(fixtures: &Fixtures, name: &str) -> Option<Vec<Scenario>> {
    let mut flows = all(fixtures);
    let end = flows.iter().position(|s| s.name == name)?;
    flows.truncate(end + 1);
    Some(flows)
}

/// The statistics panels render once the draw history finishes loading.
/// The first wait is long: the full dataset is fetched on startup.
pub fn initial_load() -> Scenario {
    Scenario::new("initial_load", "statistics panels render after data load")
        .navigate("/")
        .expect_visible(
            Locator::css("h3:has-text('Números Mais Sorteados (Top 10)')"),
            Duration::from_secs(60),
        )
        .expect_visible(
            Locator::css("h3:has-text('Último Sorteio:')"),
            Duration::from_secs(10),
        )
}

/// Generating a game suggestion also runs the historical backtest.
pub fn generate_backtest(fixtures: &Fixtures) -> Scenario {
    Scenario::new("backtest", "game suggestion and historical backtest")
        .click(Locator::button("Gerar Jogo"))
        .expect_visible(Locator::text("Seu jogo sugerido:"), Duration::from_secs(10))
        .expect_visible(
            Locator::text("Probabilidade Histórica (Backtest)"),
            Duration::from_secs(10),
        )
        .expect_visible(
            Locator::text(fixtures.backtest_tier.clone()),
            Duration::from_secs(5),
        )
        .with_success_screenshot("backtest")
}

/// Searching a past game by number shows its drawn numbers.
pub fn search_game(fixtures: &Fixtures) -> Scenario {
    Scenario::new("search", "past game lookup by number")
        .fill(
            Locator::css("input[placeholder*='Digite o número do jogo']"),
            fixtures.game_number.clone(),
        )
        .click(Locator::button("Buscar Jogo"))
        .expect_visible(
            Locator::text(format!("Dezenas do jogo {}", fixtures.game_number)),
            Duration::from_secs(20),
        )
        .with_success_screenshot("search")
}
