use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Instant;

use eframe::{App, CreationContext, Frame, NativeOptions, egui, run_native};
use egui::{ColorImage, TextureHandle, Vec2};
use storage::models::{SaveDoc, SaveSummary};
use storage::{DEFAULT_COLLECTION, DEFAULT_DB, DEFAULT_SAVE_NAME, WorldStorage, uri_from_env};
use terrain::{GenerationConfig, Terrain, World, utils::to_terrain_image};
use tokio::runtime::Runtime;

// Pixels per tile in the rendered image
const TILE_SIZE: usize = 8;

// Default slider span for world dimensions
const MIN_SIZE: usize = 8;
const MAX_SIZE: usize = 256;

// Stretch the slider so a loaded world larger than the usual span keeps its size
fn size_range(current: usize) -> RangeInclusive<usize> {
    MIN_SIZE.min(current).max(1)..=MAX_SIZE.max(current)
}

// Deferred clicks from the saves list
enum SaveAction {
    Load(String),
    Delete(String),
}

struct TerrainApp {
    // parameters
    width: usize,
    height: usize,
    seed: u64,
    config: GenerationConfig,
    config_path: Option<PathBuf>,

    // current world and what produced it
    world: Option<World>,
    world_seed: u64,
    world_config: GenerationConfig,

    // generated texture
    terrain_texture: Option<TextureHandle>,
    // Store the last RGB buffer
    last_rgb: Option<Vec<u8>>,

    // timing & status
    last_duration: Option<f32>,
    status_message: String,

    // persistence
    rt: Runtime,
    storage: Option<WorldStorage>,
    save_name: String,
    saves: Vec<SaveSummary>,
}

impl TerrainApp {
    fn new(cc: &CreationContext<'_>, rt: Runtime) -> Self {
        let mut app = Self {
            width: 96,
            height: 64,
            seed: 2025,
            config: GenerationConfig::default(),
            config_path: None,
            world: None,
            world_seed: 2025,
            world_config: GenerationConfig::default(),
            terrain_texture: None,
            last_rgb: None,
            last_duration: None,
            status_message: String::new(),
            rt,
            storage: None,
            save_name: DEFAULT_SAVE_NAME.to_string(),
            saves: Vec::new(),
        };

        // Continue the last game if there is one, otherwise start fresh
        if app.connect() && app.load_latest(&cc.egui_ctx) {
            return app;
        }
        app.generate(&cc.egui_ctx);
        app
    }

    fn generate(&mut self, ctx: &egui::Context) {
        let start = Instant::now();
        match World::from_seed(self.width, self.height, &self.config, self.seed) {
            Ok(world) => {
                self.last_duration = Some(start.elapsed().as_secs_f32() * 1000.0);
                self.world_seed = self.seed;
                self.world_config = self.config.clone();
                self.show_world(ctx, world);
                self.status_message = format!(
                    "Generated in {:.2} ms (seed {})",
                    self.last_duration.unwrap_or_default(),
                    self.seed
                );
            }
            Err(e) => {
                log::warn!("generation failed: {}", e);
                self.status_message = format!("Generation error: {}", e);
            }
        }
    }

    fn show_world(&mut self, ctx: &egui::Context, world: World) {
        let rgb = to_terrain_image(&world, TILE_SIZE);
        let size = [world.width() * TILE_SIZE, world.height() * TILE_SIZE];
        let color_image = ColorImage::from_rgb(size, &rgb);
        self.terrain_texture =
            Some(ctx.load_texture("terrain", color_image, egui::TextureOptions::NEAREST));
        self.last_rgb = Some(rgb);
        self.world = Some(world);
        ctx.request_repaint();
    }

    // Lazily open the database; false (with a status message) when unreachable
    fn connect(&mut self) -> bool {
        if self.storage.is_some() {
            return true;
        }
        let uri = uri_from_env();
        let res = self
            .rt
            .block_on(WorldStorage::init(&uri, DEFAULT_DB, DEFAULT_COLLECTION));
        match res {
            Ok(storage) => {
                self.storage = Some(storage);
                self.refresh_saves();
                true
            }
            Err(e) => {
                log::warn!("cannot reach {}: {}", uri, e);
                self.status_message = format!("DB init error: {}", e);
                false
            }
        }
    }

    fn refresh_saves(&mut self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let res = self.rt.block_on(storage.list_saves());
        match res {
            Ok(saves) => self.saves = saves,
            Err(e) => self.status_message = format!("DB error: {}", e),
        }
    }

    fn save_to_db(&mut self) {
        if !self.connect() {
            return;
        }
        let (Some(world), Some(storage)) = (&self.world, &self.storage) else {
            return;
        };
        let doc = SaveDoc::from_world(&self.save_name, self.world_seed, &self.world_config, world);
        let res = self.rt.block_on(storage.save(doc));
        self.status_message = match res {
            Ok(()) => format!("Saved '{}' to MongoDB", self.save_name),
            Err(e) => format!("DB error: {}", e),
        };
        self.refresh_saves();
    }

    // Apply a loaded document; false when there was nothing usable
    fn apply_doc(&mut self, ctx: &egui::Context, doc: Option<SaveDoc>) -> bool {
        let Some(doc) = doc else {
            self.status_message = "No such save".into();
            return false;
        };
        match doc.to_world() {
            Ok(world) => {
                self.world_seed = doc.seed as u64;
                self.seed = self.world_seed;
                self.width = world.width();
                self.height = world.height();
                self.world_config = doc.params.clone();
                self.config = doc.params;
                self.save_name = doc.name.clone();
                self.show_world(ctx, world);
                self.status_message = format!("Loaded '{}' from MongoDB", doc.name);
                true
            }
            Err(e) => {
                log::warn!("save '{}' is unreadable: {}", doc.name, e);
                self.status_message = format!("Corrupt save: {}", e);
                false
            }
        }
    }

    fn load_from_db(&mut self, ctx: &egui::Context, name: &str) {
        if !self.connect() {
            return;
        }
        let Some(storage) = &self.storage else {
            return;
        };
        let res = self.rt.block_on(storage.load(name));
        match res {
            Ok(doc) => {
                self.apply_doc(ctx, doc);
            }
            Err(e) => self.status_message = format!("DB error: {}", e),
        }
    }

    fn load_latest(&mut self, ctx: &egui::Context) -> bool {
        let Some(storage) = &self.storage else {
            return false;
        };
        let res = self.rt.block_on(storage.latest());
        match res {
            Ok(Some(doc)) => self.apply_doc(ctx, Some(doc)),
            Ok(None) => false,
            Err(e) => {
                self.status_message = format!("DB error: {}", e);
                false
            }
        }
    }

    fn delete_from_db(&mut self, name: &str) {
        if !self.connect() {
            return;
        }
        let Some(storage) = &self.storage else {
            return;
        };
        let res = self.rt.block_on(storage.delete(name));
        self.status_message = match res {
            Ok(true) => format!("Deleted '{}'", name),
            Ok(false) => format!("No save named '{}'", name),
            Err(e) => format!("DB error: {}", e),
        };
        self.refresh_saves();
    }

    fn load_config_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .pick_file()
        else {
            return;
        };
        match GenerationConfig::load(&path) {
            Ok(config) => {
                self.config = config;
                self.status_message = format!("Loaded {}", path.display());
                self.config_path = Some(path);
            }
            Err(e) => self.status_message = format!("Config error: {}", e),
        }
    }

    fn export_png(&mut self) {
        let (Some(rgb), Some(world)) = (&self.last_rgb, &self.world) else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(format!("world_{}.png", self.world_seed))
            .save_file()
        else {
            return;
        };
        self.status_message = match image::save_buffer(
            &path,
            rgb,
            (world.width() * TILE_SIZE) as u32,
            (world.height() * TILE_SIZE) as u32,
            image::ColorType::Rgb8,
        ) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => format!("PNG error: {}", e),
        };
    }

    fn parameter_controls(&mut self, ui: &mut egui::Ui) {
        ui.label("Size");
        let (w_range, h_range) = (size_range(self.width), size_range(self.height));
        ui.add(egui::Slider::new(&mut self.width, w_range).text("width"));
        ui.add(egui::Slider::new(&mut self.height, h_range).text("height"));

        ui.label("Seed");
        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(&mut self.seed).speed(1.0));
            if ui.button("Random").clicked() {
                self.seed = rand::random();
            }
        });

        ui.collapsing("Water", |ui| {
            let w = &mut self.config.water;
            ui.add(egui::Slider::new(&mut w.seed_percent, 0.0..=0.05).text("seed %"));
            ui.add(egui::Slider::new(&mut w.iterations, 0..=20).text("iterations"));
            ui.add(egui::Slider::new(&mut w.growth_chance, 0.0..=1.0).text("growth chance"));
            ui.add(egui::Slider::new(&mut w.min_neighbors, 0..=8).text("grow if more than"));
            ui.add(egui::Slider::new(&mut w.smooth_neighbors, 0..=8).text("keep if at least"));
        });

        ui.collapsing("Sand", |ui| {
            let s = &mut self.config.sand;
            ui.add(egui::Slider::new(&mut s.smooth_neighbors, 0..=8).text("keep if at least"));
        });

        ui.collapsing("Forest", |ui| {
            let f = &mut self.config.forest;
            ui.add(egui::Slider::new(&mut f.seed_percent, 0.0..=0.1).text("seed %"));
            ui.add(egui::Slider::new(&mut f.growth_chance, 0.0..=1.0).text("growth chance"));
            ui.add(egui::Slider::new(&mut f.min_neighbors, 0..=8).text("grow if more than"));
            for kind in f.kinds.iter_mut() {
                ui.add(
                    egui::Slider::new(&mut kind.decoration_count, 0..=terrain::config::MAX_DECORATIONS)
                        .text(format!("{:?} trees", kind.terrain)),
                );
            }
            if f.kinds.len() > 1 && ui.button("Swap priority").clicked() {
                f.kinds.reverse();
            }
        });

        ui.horizontal(|ui| {
            if ui.button("Load config…").clicked() {
                self.load_config_file();
            }
            if ui.button("Defaults").clicked() {
                self.config = GenerationConfig::default();
                self.config_path = None;
            }
        });
        if let Some(path) = &self.config_path {
            ui.small(path.display().to_string());
        }
    }

    fn storage_controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("Saves");
        ui.horizontal(|ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut self.save_name);
        });
        ui.horizontal(|ui| {
            if ui.button("Save to DB…").clicked() {
                self.save_to_db();
            }
            if ui.button("Load from DB…").clicked() {
                let name = self.save_name.clone();
                self.load_from_db(ctx, &name);
            }
            if ui.button("Refresh").clicked() && self.connect() {
                self.refresh_saves();
            }
        });

        let mut action = None;
        egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
            for save in &self.saves {
                ui.horizontal(|ui| {
                    let when = save
                        .saved_at
                        .try_to_rfc3339_string()
                        .unwrap_or_else(|_| "?".into());
                    ui.label(format!("{}  {}", save.name, when));
                    if ui.small_button("Load").clicked() {
                        action = Some(SaveAction::Load(save.name.clone()));
                    }
                    if ui.small_button("Delete").clicked() {
                        action = Some(SaveAction::Delete(save.name.clone()));
                    }
                });
            }
        });
        match action {
            Some(SaveAction::Load(name)) => self.load_from_db(ctx, &name),
            Some(SaveAction::Delete(name)) => self.delete_from_db(&name),
            None => {}
        }
    }
}

impl App for TerrainApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("World Generator");
                ui.separator();

                self.parameter_controls(ui);
                ui.separator();

                if ui.button("Generate World").clicked() {
                    self.generate(ctx);
                }
                if ui.button("Save PNG…").clicked() {
                    self.export_png();
                }
                ui.separator();

                self.storage_controls(ui, ctx);
                ui.separator();
                ui.label(&self.status_message);
            });
        });

        // central display
        egui::CentralPanel::default().show(ctx, |ui| {
            let (Some(tex), Some(world)) = (&self.terrain_texture, &self.world) else {
                ui.centered_and_justified(|ui| {
                    ui.label("Click “Generate World” to start");
                });
                return;
            };

            let counts = Terrain::ALL
                .iter()
                .map(|&t| format!("{:?}: {}", t, world.terrain().count(t)))
                .collect::<Vec<_>>()
                .join("   ");
            ui.label(format!(
                "{}×{}   {}   trees: {}",
                world.width(),
                world.height(),
                counts,
                world.decorations().total()
            ));
            ui.separator();

            // Fit the map into the panel, keeping its aspect ratio
            let available = ui.available_size();
            let map = Vec2::new(world.width() as f32, world.height() as f32);
            let scale = (available.x / map.x).min(available.y / map.y).max(0.1);
            ui.image((tex.id(), map * scale));
        });
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([500.0, 400.0]),
        ..Default::default()
    };
    run_native(
        "Terrain World Generator",
        opts,
        Box::new(|cc| Ok(Box::new(TerrainApp::new(cc, rt)))),
    )?;
    Ok(())
}
