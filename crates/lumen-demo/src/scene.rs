use lumen_engine::coords::{CornerRadii, Rect};
use lumen_engine::paint::Color;
use lumen_engine::render::FrameStats;
use lumen_engine::scene::{CommandList, ElementId};
use lumen_engine::text::FontId;

const PAD: f32 = 16.0;
const HEADER_H: f32 = 48.0;
const ROW_H: f32 = 28.0;
const ROWS: u64 = 64;
const SCROLL_SPEED: f32 = 24.0; // logical px per second

const TITLE: ElementId = ElementId::from_label("header.title");
const STATS: ElementId = ElementId::from_label("header.stats");
const LIST: ElementId = ElementId::from_label("list");
const SIDEBAR: ElementId = ElementId::from_label("sidebar");

/// Hand-written layout standing in for a UI framework.
pub struct DemoScene {
    font: FontId,
    scroll: f32,
    elapsed: f32,
}

impl DemoScene {
    pub fn new(font: FontId) -> Self {
        Self { font, scroll: 0.0, elapsed: 0.0 }
    }

    /// Records one frame into `list`. `width`/`height` are logical pixels.
    pub fn build(&mut self, list: &mut CommandList, width: f32, height: f32, dt: f32, stats: FrameStats) {
        self.elapsed += dt;

        let panel = Color::from_srgb_u8(32, 36, 46, 255);
        let accent = Color::from_srgb_u8(92, 156, 255, 255);
        let text = Color::from_srgb_u8(224, 228, 236, 255);
        let muted = Color::from_srgb_u8(140, 148, 164, 255);

        // ── header ─────────────────────────────────────────────────────────
        let header = Rect::new(PAD, PAD, width - PAD * 2.0, HEADER_H);
        list.push_rect(header, CornerRadii::all(8.0), panel);
        list.push_text(TITLE, Rect::new(header.origin.x + 14.0, header.origin.y + 14.0, 300.0, 24.0), "lumen", self.font, 20.0, text);

        let stats_line = format!(
            "{:>3.0} fps  {} quads  {} texts  {} regions  {} draws",
            stats.fps, stats.quads, stats.texts, stats.regions, stats.draw_calls
        );
        list.push_text(STATS, Rect::new(header.origin.x + 140.0, header.origin.y + 17.0, 500.0, 20.0), stats_line, self.font, 14.0, muted);

        // ── sidebar ────────────────────────────────────────────────────────
        let top = PAD * 2.0 + HEADER_H;
        let body_h = (height - top - PAD).max(0.0);
        let sidebar = Rect::new(PAD, top, 200.0, body_h);
        list.push_rect(sidebar, CornerRadii::all(8.0), panel);
        list.push_border(sidebar, CornerRadii::all(8.0), accent.with_opacity(0.5), 1.0);

        for (i, label) in ["Overview", "Layers", "Text cache", "Settings"].iter().enumerate() {
            let y = top + 12.0 + i as f32 * 32.0;
            let selected = i == (self.elapsed as usize / 2) % 4;
            if selected {
                list.push_rect(Rect::new(PAD + 8.0, y, 184.0, 26.0), CornerRadii::all(4.0), accent.with_opacity(0.25));
            }
            list.push_text(SIDEBAR.child(i as u64), Rect::new(PAD + 18.0, y + 5.0, 170.0, 20.0), *label, self.font, 14.0, text);
        }

        // ── scrolling list (clipped) ───────────────────────────────────────
        let area = Rect::new(PAD * 2.0 + 200.0, top, width - PAD * 3.0 - 200.0, body_h);
        list.push_rect(area, CornerRadii::all(8.0), panel);
        list.push_clip(area);

        let content_h = ROWS as f32 * ROW_H;
        let max_scroll = (content_h - area.size.y).max(0.0);
        self.scroll = if max_scroll > 0.0 { (self.elapsed * SCROLL_SPEED) % max_scroll } else { 0.0 };

        for i in 0..ROWS {
            let y = area.origin.y + i as f32 * ROW_H - self.scroll;
            if y + ROW_H < area.origin.y || y > area.origin.y + area.size.y {
                continue;
            }
            let row = Rect::new(area.origin.x + 8.0, y + 2.0, area.size.x - 16.0, ROW_H - 4.0);
            if i % 2 == 0 {
                list.push_solid_rect(row, Color::from_srgb_u8(40, 45, 58, 255));
            }
            list.push_text(LIST.child(i), Rect::new(row.origin.x + 10.0, row.origin.y + 4.0, 200.0, 18.0), format!("Item {i:02}"), self.font, 14.0, text);

            // Nested clip: the progress fill is cut to its track.
            let track = Rect::new(row.origin.x + row.size.x - 170.0, row.origin.y + 8.0, 160.0, 8.0);
            list.push_rect(track, CornerRadii::all(4.0), Color::from_srgb_u8(24, 26, 34, 255));
            list.push_clip(track);
            let progress = ((self.elapsed * 0.2 + i as f32 * 0.07) % 1.0) * track.size.x;
            list.push_rect(Rect::new(track.origin.x, track.origin.y, progress, track.size.y), CornerRadii::all(4.0), accent);
            list.pop_clip();
        }

        list.pop_clip();
    }
}
