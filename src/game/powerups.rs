//! Power-up ledger.
//!
//! Every transition takes the record by value and returns the updated copy.
//! Stars only ever go up by one or down by [`STAR_COST`].

use serde::{Deserialize, Serialize};

use crate::game::Effect;

/// Stars spent for one extra roll.
pub const STAR_COST: u32 = 3;

/// Extra squares granted by a speed boost.
pub const SPEED_BOOST_BONUS: u8 = 2;

/// A die roll after the speed boost has been considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoostedRoll {
    /// Squares to move.
    pub delta: u8,
    /// Whether the boost contributed. The caller clears it only once the move commits.
    pub used: bool,
}

/// Per-player power-up state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUps {
    /// Collected stars.
    pub stars: u32,
    /// +2 on the next committed move.
    pub speed_boost: bool,
    /// Absorbs the next negative effect.
    pub shield: bool,
}

impl PowerUps {
    /// Collect one star.
    #[must_use]
    pub const fn grant_star(self) -> Self {
        Self {
            stars: self.stars + 1,
            ..self
        }
    }

    /// Arm the speed boost.
    #[must_use]
    pub const fn grant_speed_boost(self) -> Self {
        Self {
            speed_boost: true,
            ..self
        }
    }

    /// Raise the shield.
    #[must_use]
    pub const fn grant_shield(self) -> Self {
        Self {
            shield: true,
            ..self
        }
    }

    /// Compute the movement for `roll` without consuming the boost.
    #[must_use]
    pub const fn apply_speed_boost(self, roll: u8) -> BoostedRoll {
        if self.speed_boost {
            BoostedRoll {
                delta: roll + SPEED_BOOST_BONUS,
                used: true,
            }
        } else {
            BoostedRoll {
                delta: roll,
                used: false,
            }
        }
    }

    /// Consume the speed boost after a boosted move commits.
    #[must_use]
    pub const fn clear_speed_boost(self) -> Self {
        Self {
            speed_boost: false,
            ..self
        }
    }

    /// Check if an extra roll can be bought.
    #[must_use]
    pub const fn has_enough_stars(self) -> bool {
        self.stars >= STAR_COST
    }

    /// Spend [`STAR_COST`] stars. Returns the record unchanged when short.
    #[must_use]
    pub const fn spend_stars_for_extra_roll(self) -> Self {
        if !self.has_enough_stars() {
            return self;
        }
        Self {
            stars: self.stars - STAR_COST,
            ..self
        }
    }

    /// Spend the shield if `effect` is negative and a shield is up.
    ///
    /// Returns the updated record and whether the effect was absorbed.
    #[must_use]
    pub const fn consume_shield_if_negative(self, effect: Effect) -> (Self, bool) {
        if self.shield && effect.is_negative() {
            (
                Self {
                    shield: false,
                    ..self
                },
                true,
            )
        } else {
            (self, false)
        }
    }

    /// Short status badges for display.
    #[must_use]
    pub fn badges(self) -> Vec<String> {
        let mut badges = Vec::new();
        if self.stars > 0 {
            badges.push(format!("⭐ {}/{STAR_COST}", self.stars));
        }
        if self.speed_boost {
            badges.push(format!("💨 Speed +{SPEED_BOOST_BONUS}"));
        }
        if self.shield {
            badges.push("🛡️ Protected".to_string());
        }
        badges
    }
}
