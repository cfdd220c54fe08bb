use serde::Serialize;
use strum::{EnumCount, EnumIter, FromRepr};

/// Game feature numbers shared by most actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumCount, FromRepr)]
#[repr(u8)]
pub enum Feature {
    Trains = 0x00,
    Vehicles = 0x01,
    Ships = 0x02,
    Aircraft = 0x03,
    Stations = 0x04,
    Canals = 0x05,
    Bridges = 0x06,
    Houses = 0x07,
    GlobalSettings = 0x08,
    IndustryTiles = 0x09,
    Industries = 0x0A,
    Cargos = 0x0B,
    SoundEffects = 0x0C,
    Airports = 0x0D,
    Signals = 0x0E,
    Objects = 0x0F,
    RailTypes = 0x10,
    AirportTiles = 0x11,
    RoadTypes = 0x12,
    TramTypes = 0x13,
    RoadStops = 0x14,
    Badges = 0x15,
}
