//! Immediate-mode draw pass
//!
//! Z-order, back to front: background tiles, player, meteors, bullets,
//! lives readout. Everything is drawn fresh each frame from `GameState`.

use std::io;

use crate::assets::SpriteSet;
use crate::hud;
use crate::platform::Surface;
use crate::sim::GameState;

/// Where the lives readout sits (logical pixels)
pub const HUD_POSITION: (f32, f32) = (10.0, 10.0);

/// Compose and present one frame
pub fn draw_frame(
    surface: &mut dyn Surface,
    sprites: &SpriteSet,
    state: &GameState,
) -> io::Result<()> {
    surface.begin_frame()?;

    for y in state.background.tile_positions() {
        surface.blit(&sprites.background, 0.0, y);
    }

    for item in state.draw_list() {
        surface.blit(sprites.image(item.sprite), item.rect.left(), item.rect.top());
    }

    let (x, y) = HUD_POSITION;
    surface.draw_text(&hud::lives_label(state.player.lives), x, y);

    surface.present()
}
