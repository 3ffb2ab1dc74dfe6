use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use gridpad_config::EditorConfig;
use gridpad_core::{
    Axis, CaretWidget, Document, Editor, EditorOptions, GlyphMetrics, GridSize, GridSurface,
    LayoutMode, ScrollbarWidget,
};

mod script;

/// Replays key scripts against a text document and prints the visible grid.
#[derive(Parser, Debug)]
#[command(name = "gridpad", version, about)]
struct Cli {
    /// File to open. Starts with an empty document when omitted.
    file: Option<PathBuf>,

    /// Config file to use instead of the one next to the executable.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start in word-wrap mode.
    #[arg(long)]
    wrap: bool,

    /// Window width in cells.
    #[arg(long)]
    columns: Option<usize>,

    /// Window height in cells.
    #[arg(long)]
    rows: Option<usize>,

    /// Comma-separated key script, e.g. "down,end,text:abc,enter".
    #[arg(long)]
    keys: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for the grid dump
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting gridpad");

    let config = effective_config(&cli);
    let doc = load_document(cli.file.as_deref(), config.document_limit())?;
    let mut editor = Editor::new(doc, editor_options(&config));

    if let Some(keys) = &cli.keys {
        let commands = script::parse(keys)?;
        tracing::info!("Replaying {} key(s)", commands.len());
        for command in &commands {
            script::apply(&mut editor, command)
                .with_context(|| format!("failed to apply {command:?}"))?;
        }
    }

    let glyph = GlyphMetrics {
        width: config.glyph_width,
        height: config.glyph_height,
    };
    print!("{}", render_screen(&editor, glyph));
    Ok(())
}

/// Config file values with command-line overrides applied.
fn effective_config(cli: &Cli) -> EditorConfig {
    let path = cli.config.clone().unwrap_or_else(EditorConfig::config_path);
    let mut config = EditorConfig::load_or_create(&path);
    if cli.wrap {
        config.word_wrap = true;
    }
    if let Some(columns) = cli.columns {
        config.columns = columns;
    }
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    config.sanitize();
    config
}

fn editor_options(config: &EditorConfig) -> EditorOptions {
    EditorOptions {
        window: GridSize::new(config.columns, config.rows),
        mode: if config.word_wrap {
            LayoutMode::Wrap
        } else {
            LayoutMode::Fixed
        },
        caret: config.caret_enabled,
        page_overlap: config.page_overlap,
    }
}

fn load_document(path: Option<&Path>, limit: Option<usize>) -> Result<Document> {
    let Some(path) = path else {
        return Ok(limit.map_or_else(Document::new, Document::with_store_limit));
    };
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let doc = match limit {
        Some(limit) => Document::from_bytes_with_limit(&bytes, limit),
        None => Document::from_bytes(&bytes),
    }
    .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(doc)
}

/// Collects what the editor pushes to its scrollbar and caret widgets.
#[derive(Debug, Default)]
struct StatusProbe {
    vertical: (usize, usize),
    horizontal: (usize, usize),
    caret: Option<(usize, usize)>,
}

impl ScrollbarWidget for StatusProbe {
    fn set_range(&mut self, axis: Axis, _min: usize, max: usize) {
        match axis {
            Axis::Vertical => self.vertical.1 = max,
            Axis::Horizontal => self.horizontal.1 = max,
        }
    }

    fn set_position(&mut self, axis: Axis, pos: usize) {
        match axis {
            Axis::Vertical => self.vertical.0 = pos,
            Axis::Horizontal => self.horizontal.0 = pos,
        }
    }
}

impl CaretWidget for StatusProbe {
    fn show(&mut self) {
        self.caret.get_or_insert((0, 0));
    }

    fn hide(&mut self) {
        self.caret = None;
    }

    fn move_to(&mut self, x: usize, y: usize) {
        self.caret = Some((x, y));
    }
}

fn status_line(editor: &Editor, glyph: GlyphMetrics) -> String {
    let mut probe = StatusProbe::default();
    editor.sync_scrollbars(&mut probe);
    editor.sync_caret(glyph, &mut probe);

    let caret = match (editor.caret(), probe.caret) {
        (None, _) => "no caret".to_string(),
        (Some(caret), shown) => {
            let pos = caret.position();
            let place = match shown {
                Some((x, y)) => format!("at {x},{y}px"),
                None => "hidden".to_string(),
            };
            format!("Ln {}, Col {} ({place})", pos.index + 1, pos.offset + 1)
        }
    };
    format!(
        "{caret} | {:?} | {} lines | V {}/{} | H {}/{}",
        editor.mode(),
        editor.document().line_count(),
        probe.vertical.0,
        probe.vertical.1,
        probe.horizontal.0,
        probe.horizontal.1,
    )
}

fn render_screen(editor: &Editor, glyph: GlyphMetrics) -> String {
    let window = editor.viewport().window();
    let mut grid = GridSurface::new(window.columns, window.rows);
    editor.render(&mut grid);

    let mut out = String::new();
    for line in grid.lines() {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&status_line(editor, glyph));
    out.push('\n');
    out
}
