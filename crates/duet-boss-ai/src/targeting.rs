//! Which player an aimed attack goes for.

use rand::Rng;

use duet_core::constants::FOCUS_FIRE_RATIO;
use duet_core::enums::PlayerSlot;

/// Pick a target for one aimed shot.
///
/// Above [`FOCUS_FIRE_RATIO`] boss health the target is uniformly random.
/// At or below it the player with strictly lower health is chosen, with a
/// uniform draw on an exact tie. Call once per shot; never cache the result.
pub fn pick_target<R: Rng + ?Sized>(
    boss_health_ratio: f32,
    player_health: [f32; 2],
    rng: &mut R,
) -> PlayerSlot {
    if boss_health_ratio <= FOCUS_FIRE_RATIO {
        let [wizard, warrior] = player_health;
        if wizard < warrior {
            return PlayerSlot::Wizard;
        }
        if warrior < wizard {
            return PlayerSlot::Warrior;
        }
    }
    PlayerSlot::from_index(rng.gen_range(0..2))
}
