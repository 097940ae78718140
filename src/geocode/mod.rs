pub mod nominatim;
pub mod traits;

pub use nominatim::NominatimGeocoder;
pub use traits::Geocoder;
