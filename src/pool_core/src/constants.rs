/// Seeded teams in each conference bracket
pub const TEAMS_PER_CONFERENCE: usize = 7;

/// Teams across both conferences; also the largest point value an entry may assign
pub const TOTAL_TEAMS: usize = 2 * TEAMS_PER_CONFERENCE;

/// Seed that skips the Wild Card round
pub const BYE_SEED: u8 = 1;

/// Wild Card pairings as (matchup id, home seed, away seed)
pub const WILD_CARD_PAIRINGS: [(&str, u8, u8); 3] = [
    (WC_2V7, 2, 7),
    (WC_3V6, 3, 6),
    (WC_4V5, 4, 5),
];

pub const WC_2V7: &str = "wc_2v7";
pub const WC_3V6: &str = "wc_3v6";
pub const WC_4V5: &str = "wc_4v5";

/// Bye team against the lowest surviving Wild Card winner
pub const DIV_1V_LOWEST: &str = "div_1vLowest";

/// The two remaining Wild Card winners
pub const DIV_MIDDLE: &str = "div_middle";

pub const CONFERENCE_CHAMPIONSHIP: &str = "championship";

pub const SUPER_BOWL: &str = "superBowl";
