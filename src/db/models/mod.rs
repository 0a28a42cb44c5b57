//! Entity models backed by the embedded store
//!
//! 命名与字段沿用下发协议中的叫法：`area_no` 为区域下发编号（写入硬件），
//! `area_id` 为外部区域编码，二者全局唯一。

pub mod anchor;
pub mod anchor_group;
pub mod neighbor;
pub mod site_map;
pub mod switch_area;
pub mod switch_line;
pub mod sys_config;

pub use anchor::{Anchor, AnchorConfig};
pub use anchor_group::AnchorGroup;
pub use neighbor::AreaNeighbor;
pub use site_map::SiteMap;
pub use switch_area::{SwitchArea, SwitchAreaCreate, SwitchAreaUpdate};
pub use switch_line::SwitchLine;
pub use sys_config::SysConfig;
