use std::io::Write;

use anyhow::{Context, Result};
use geocoin_core::TrackingMode;
use geocoin_rendering::{CacheHandle, CachePresentation, Notice, PlayerPresentation, Renderer};

/// Renderer that prints the session as lines of text.
#[derive(Debug)]
pub(crate) struct TerminalRenderer<W> {
    out: W,
    next_handle: u64,
}

impl<W: Write> TerminalRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            next_handle: 0,
        }
    }

    /// Prints a free-form line below the map output.
    pub(crate) fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").context("failed to write to terminal")
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn describe(
        &mut self,
        marker: char,
        handle: CacheHandle,
        cache: &CachePresentation,
    ) -> Result<()> {
        let corner = cache.southwest;
        writeln!(
            self.out,
            "{marker} [{handle}] {} at {:.6}, {:.6}",
            cache.summary(),
            corner.y,
            corner.x
        )
        .context("failed to write to terminal")?;
        if !cache.coins.is_empty() {
            let coins: Vec<String> = cache.coins.iter().map(ToString::to_string).collect();
            writeln!(self.out, "      coins: {}", coins.join(" "))
                .context("failed to write to terminal")?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn show_cache(&mut self, cache: &CachePresentation) -> Result<CacheHandle> {
        self.next_handle += 1;
        let handle = CacheHandle::new(self.next_handle);
        self.describe('+', handle, cache)?;
        Ok(handle)
    }

    fn update_cache(&mut self, handle: CacheHandle, cache: &CachePresentation) -> Result<()> {
        self.describe('~', handle, cache)
    }

    fn remove_all(&mut self) -> Result<()> {
        writeln!(self.out, "-- nearby caches --").context("failed to write to terminal")
    }

    fn show_player(&mut self, player: &PlayerPresentation) -> Result<()> {
        let mode = match player.tracking {
            TrackingMode::Manual => "manual",
            TrackingMode::Geolocation => "gps",
        };
        writeln!(
            self.out,
            "@ {:.6}, {:.6} ({mode}, {} steps) | {}",
            player.position.y,
            player.position.x,
            player.trail.len().saturating_sub(1),
            player.status()
        )
        .context("failed to write to terminal")?;
        self.out.flush().context("failed to flush terminal")
    }

    fn notify(&mut self, notice: &Notice) -> Result<()> {
        let marker = if notice.is_rejection() { '!' } else { '*' };
        writeln!(self.out, "{marker} {notice}").context("failed to write to terminal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocoin_core::{Coin, GeoBounds, GeoCoord, GridCell};

    fn output(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).expect("terminal output is utf-8")
    }

    #[test]
    fn caches_receive_sequential_handles() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        let cell = GridCell::new(1, 2);
        let cache = CachePresentation::new(
            cell,
            GeoBounds::new(GeoCoord::new(1.0, 2.0), GeoCoord::new(1.5, 2.5)),
            vec![Coin::new(cell, 0)],
        );

        let first = renderer.show_cache(&cache).expect("written");
        let second = renderer.show_cache(&cache).expect("written");
        assert_eq!(first, CacheHandle::new(1));
        assert_eq!(second, CacheHandle::new(2));

        let text = output(renderer);
        assert!(text.contains("+ [#1] Cache (1, 2) holds 1 coin at 1.000000, 2.000000"));
        assert!(text.contains("coins: 1:2#0"));
    }

    #[test]
    fn player_line_reports_purse_and_mode() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        let trail = [GeoCoord::new(0.0, 0.0), GeoCoord::new(0.5, 0.25)];
        renderer
            .show_player(&PlayerPresentation::new(
                trail[1],
                3,
                &trail,
                TrackingMode::Geolocation,
            ))
            .expect("written");

        assert_eq!(
            output(renderer),
            "@ 0.500000, 0.250000 (gps, 1 steps) | Player has 3 coins\n"
        );
    }

    #[test]
    fn rejections_are_marked() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer
            .notify(&Notice::UnknownCache {
                handle: CacheHandle::new(9),
            })
            .expect("written");
        assert_eq!(output(renderer), "! Cache #9 is no longer on the map\n");
    }
}
