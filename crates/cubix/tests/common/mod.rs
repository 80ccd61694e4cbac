//! Instrumented collaborators shared by the integration tests.
//!
//! Every collaborator writes into one [`Shared`] record, so a test can read
//! the exact order in which the orchestrator called them.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use cubix::core::{ClientConfig, ComponentError, GameComponent, GameData, HookResult, Phase};
use cubix::shared::{BlockId, BlockPos, ChunkCoord, FpsLimitMethod};
use cubix::{
    Bitmap, ClientEvent, Collaborators, EventSender, Game, GfxError, NetworkPeer, PhysicsSim,
    Session, Surface, TextureId, TextureUploader, Ui, WorldStorage,
};

/// One observed collaborator call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    SetBlock(BlockPos, BlockId),
    Lighting(BlockPos),
    MarkDirty(ChunkCoord),
    ViewDistance(i32),
    WorldReset,
    Notify {
        pos: BlockPos,
        block: BlockId,
        applied_locally: bool,
    },
    Physics {
        pos: BlockPos,
        old: BlockId,
        new: BlockId,
    },
    SurfaceCreate,
    SurfaceDestroy,
    Vsync(bool),
    Fullscreen,
    Render,
    Present,
    Screenshot,
    Upload,
    DeleteTexture(TextureId),
    Disconnect(String, String),
    Notice(String),
    Hook(&'static str, Phase),
}

/// State shared by every instrumented collaborator.
pub struct Shared {
    pub log: RefCell<Vec<Call>>,
    pub blocks: RefCell<HashMap<BlockPos, BlockId>>,
    pub world_size: i32,
    pub client_size: Cell<(i32, i32)>,
    pub inbox: RefCell<Vec<ClientEvent>>,
    pub window_closed: Cell<bool>,
    pub fail_create: Cell<bool>,
    pub surface_lost: Cell<bool>,
    pub render_oom: Cell<u32>,
    pub upload_oom: Cell<u32>,
    pub upload_broken: Cell<bool>,
    pub next_texture: Cell<u32>,
}

impl Shared {
    pub fn new(world_size: i32) -> Rc<Self> {
        Rc::new(Self {
            log: RefCell::new(Vec::new()),
            blocks: RefCell::new(HashMap::new()),
            world_size,
            client_size: Cell::new((854, 480)),
            inbox: RefCell::new(Vec::new()),
            window_closed: Cell::new(false),
            fail_create: Cell::new(false),
            surface_lost: Cell::new(false),
            render_oom: Cell::new(0),
            upload_oom: Cell::new(0),
            upload_broken: Cell::new(false),
            next_texture: Cell::new(1),
        })
    }

    pub fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.log.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.log.borrow().iter().position(pred)
    }

    /// Hook calls only, as `(component, phase)`.
    pub fn hooks(&self) -> Vec<(&'static str, Phase)> {
        self.log
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Hook(name, phase) => Some((*name, *phase)),
                _ => None,
            })
            .collect()
    }

    pub fn block(&self, pos: BlockPos) -> Option<BlockId> {
        self.blocks.borrow().get(&pos).copied()
    }
}

/// Takes one from a failure budget, returning true while it lasts.
fn consume(budget: &Cell<u32>) -> bool {
    match budget.get() {
        0 => false,
        u32::MAX => true,
        n => {
            budget.set(n - 1);
            true
        }
    }
}

// =============================================================================
// Collaborators
// =============================================================================

pub struct RecWorld(pub Rc<Shared>);

impl WorldStorage for RecWorld {
    fn contains(&self, pos: BlockPos) -> bool {
        let range = 0..self.0.world_size;
        range.contains(&pos.x) && range.contains(&pos.y) && range.contains(&pos.z)
    }

    fn get_block(&self, pos: BlockPos) -> BlockId {
        self.0.block(pos).unwrap_or(0)
    }

    fn set_block(&mut self, pos: BlockPos, block: BlockId) {
        self.0.blocks.borrow_mut().insert(pos, block);
        self.0.record(Call::SetBlock(pos, block));
    }

    fn recalculate_lighting(&mut self, pos: BlockPos, _old: BlockId, _new: BlockId) {
        self.0.record(Call::Lighting(pos));
    }

    fn mark_chunk_dirty(&mut self, chunk: ChunkCoord) {
        self.0.record(Call::MarkDirty(chunk));
    }

    fn apply_view_distance(&mut self, distance: i32) {
        self.0.record(Call::ViewDistance(distance));
    }

    fn reset(&mut self) {
        self.0.blocks.borrow_mut().clear();
        self.0.record(Call::WorldReset);
    }
}

pub struct RecPeer(pub Rc<Shared>);

impl NetworkPeer for RecPeer {
    fn notify_block_change(&mut self, pos: BlockPos, block: BlockId) {
        let applied_locally = self.0.block(pos) == Some(block);
        self.0.record(Call::Notify {
            pos,
            block,
            applied_locally,
        });
    }
}

pub struct RecPhysics(pub Rc<Shared>);

impl PhysicsSim for RecPhysics {
    fn trigger_local_physics(&mut self, pos: BlockPos, old: BlockId, new: BlockId) {
        self.0.record(Call::Physics { pos, old, new });
    }
}

pub struct RecSurface {
    shared: Rc<Shared>,
    created: bool,
}

impl Surface for RecSurface {
    fn create(&mut self, _title: &str, _width: i32, _height: i32) -> Result<(), GfxError> {
        if self.shared.fail_create.get() {
            return Err(GfxError::Other("no display".into()));
        }
        self.created = true;
        self.shared.record(Call::SurfaceCreate);
        Ok(())
    }

    fn destroy(&mut self) {
        self.created = false;
        self.shared.record(Call::SurfaceDestroy);
    }

    fn exists(&self) -> bool {
        self.created && !self.shared.window_closed.get()
    }

    fn client_size(&self) -> (i32, i32) {
        self.shared.client_size.get()
    }

    fn poll_events(&mut self, events: &EventSender) {
        for event in self.shared.inbox.borrow_mut().drain(..) {
            events.send(event);
        }
    }

    fn set_vsync(&mut self, enabled: bool) {
        self.shared.record(Call::Vsync(enabled));
    }

    fn toggle_fullscreen(&mut self) -> Result<(), GfxError> {
        self.shared.record(Call::Fullscreen);
        Ok(())
    }

    fn render_frame(&mut self, _game: &GameData, _delta: f64) -> Result<(), GfxError> {
        if self.shared.surface_lost.get() {
            return Err(GfxError::SurfaceLost("device removed".into()));
        }
        if consume(&self.shared.render_oom) {
            return Err(GfxError::OutOfVideoMemory);
        }
        self.shared.record(Call::Render);
        Ok(())
    }

    fn present(&mut self) -> Result<(), GfxError> {
        self.shared.record(Call::Present);
        Ok(())
    }

    fn take_screenshot(&mut self) -> Result<String, GfxError> {
        self.shared.record(Call::Screenshot);
        Ok("screenshot.png".into())
    }
}

pub struct RecTextures(pub Rc<Shared>);

impl TextureUploader for RecTextures {
    fn max_size(&self) -> u32 {
        1024
    }

    fn upload(&mut self, _bitmap: &Bitmap) -> Result<TextureId, GfxError> {
        if consume(&self.0.upload_oom) {
            return Err(GfxError::OutOfVideoMemory);
        }
        if self.0.upload_broken.get() {
            return Err(GfxError::Other("driver rejected texture".into()));
        }
        self.0.record(Call::Upload);
        let id = self.0.next_texture.get();
        self.0.next_texture.set(id + 1);
        Ok(TextureId(id))
    }

    fn delete(&mut self, texture: TextureId) {
        self.0.record(Call::DeleteTexture(texture));
    }
}

pub struct RecUi(pub Rc<Shared>);

impl Ui for RecUi {
    fn show_disconnect(&mut self, title: &str, reason: &str) {
        self.0.record(Call::Disconnect(title.into(), reason.into()));
    }

    fn show_notice(&mut self, message: &str) {
        self.0.record(Call::Notice(message.into()));
    }
}

/// A component logging every hook, optionally failing one phase.
pub struct Recorder {
    pub name: &'static str,
    pub shared: Rc<Shared>,
    pub fail_on: Option<Phase>,
}

impl Recorder {
    pub fn new(name: &'static str, shared: &Rc<Shared>) -> Self {
        Self {
            name,
            shared: Rc::clone(shared),
            fail_on: None,
        }
    }

    pub fn failing(name: &'static str, shared: &Rc<Shared>, phase: Phase) -> Self {
        Self {
            fail_on: Some(phase),
            ..Self::new(name, shared)
        }
    }

    fn record(&self, phase: Phase) -> HookResult {
        self.shared.record(Call::Hook(self.name, phase));
        if self.fail_on == Some(phase) {
            return Err(ComponentError::new(format!("{} refused {phase}", self.name)));
        }
        Ok(())
    }
}

impl GameComponent for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }
    fn init(&mut self, _game: &mut GameData) -> HookResult {
        self.record(Phase::Init)
    }
    fn free(&mut self, _game: &mut GameData) -> HookResult {
        self.record(Phase::Free)
    }
    fn reset(&mut self, _game: &mut GameData) -> HookResult {
        self.record(Phase::Reset)
    }
    fn on_new_map(&mut self, _game: &mut GameData) -> HookResult {
        self.record(Phase::NewMap)
    }
    fn on_new_map_loaded(&mut self, _game: &mut GameData) -> HookResult {
        self.record(Phase::NewMapLoaded)
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Config without frame pacing, so tests never sleep.
pub fn test_config() -> ClientConfig {
    ClientConfig {
        fps_limit: FpsLimitMethod::Unlimited,
        ..ClientConfig::default()
    }
}

pub fn collaborators(shared: &Rc<Shared>, multiplayer: bool) -> Collaborators {
    let session = if multiplayer {
        Session::Multiplayer(Box::new(RecPeer(Rc::clone(shared))))
    } else {
        Session::Singleplayer(Box::new(RecPhysics(Rc::clone(shared))))
    };
    Collaborators {
        world: Box::new(RecWorld(Rc::clone(shared))),
        session,
        surface: Box::new(RecSurface {
            shared: Rc::clone(shared),
            created: false,
        }),
        textures: Box::new(RecTextures(Rc::clone(shared))),
        ui: Box::new(RecUi(Rc::clone(shared))),
    }
}

pub fn game_with(config: &ClientConfig, shared: &Rc<Shared>, multiplayer: bool) -> Game {
    Game::new(config, collaborators(shared, multiplayer)).unwrap()
}

pub fn multiplayer_game(shared: &Rc<Shared>) -> Game {
    game_with(&test_config(), shared, true)
}

pub fn singleplayer_game(shared: &Rc<Shared>) -> Game {
    game_with(&test_config(), shared, false)
}
