//! Raster basemap choices. Tiles are fetched by the map surface; the engine
//! only tells it which source to use.

use serde::Deserialize;
use strum::{Display, EnumIter, EnumString};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum Basemap {
    #[default]
    #[strum(to_string = "Standard", serialize = "standard")]
    Standard,
    #[strum(to_string = "Open Street", serialize = "open-street", serialize = "openstreet")]
    OpenStreet,
    #[strum(to_string = "Satellite", serialize = "satellite")]
    Satellite,
    #[strum(to_string = "Dark Mode", serialize = "dark")]
    Dark,
}

impl Basemap {
    pub fn url_template(&self) -> &'static str {
        match self {
            Basemap::Standard => {
                "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png"
            }
            Basemap::OpenStreet => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            Basemap::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
            Basemap::Dark => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            Basemap::Standard | Basemap::Dark => "© OpenStreetMap © CARTO",
            Basemap::OpenStreet => "© OpenStreetMap",
            Basemap::Satellite => "Tiles © Esri",
        }
    }
}
