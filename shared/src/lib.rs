pub mod character;
pub mod constants;
pub mod cooldown;
pub mod corner;
pub mod motion;
pub mod orientation;
pub mod rapier_world;
pub mod scanner;
pub mod settings;
pub mod surface;
pub mod types;
pub mod wall_run;

pub use character::CharacterState;
pub use constants::{
    AUTO_WALL_RUN, MIN_TICK_TIME, WALL_MAX_NORMAL_UP_DOT, WALL_RUN_COOLDOWN,
    WALL_RUN_CORNER_TURN_DURATION, WALL_RUN_INITIATION_DURATION, WALL_RUN_ROTATION_INTERP_SPEED,
    WALL_RUN_SPEED_MPS, WALL_SEARCH_RADIUS_SCALE,
};
pub use corner::{CornerDecision, CornerTurn, decide_corner_turn};
pub use orientation::{WallRunFrame, interp_rotation_to};
pub use rapier_world::{
    CharacterMove, ColliderShapeDef, StaticQueryWorld, WorldStaticDef, build_static_query_world,
    collider_from_def,
};
pub use scanner::{WallScan, WallScanner, WorldQuery};
pub use settings::WallRunSettings;
pub use surface::{RejectionCache, SurfaceTags, can_start_wall_run};
pub use types::{
    CapsuleSpec, Contact, CornerType, MovementMode, Quat, SurfaceId, Vec3, WallRunEvent,
    WallRunExit, WallRunSide,
};
pub use wall_run::{WallRunState, WallRunner};
