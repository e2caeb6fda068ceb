//! Mean orbital elements of the major planets (J2000 ecliptic and equinox).
//!
//! Elements and their linear rates per Julian century come from the JPL "Approximate
//! Positions of the Planets" fit for 1800–2050 AD. Within that interval the heliocentric
//! direction errors stay below a few arcminutes for the planets followed here.

use nalgebra::Vector3;

use crate::constants::{MJD, RADEG, T2000};
use crate::kepler::solve_kepler;
use crate::ref_system::rotmt;
use crate::sky_errors::SkyError;

/// Bodies orbiting the Sun for which mean elements are tabulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Planet {
    Mercury,
    Venus,
    /// Earth–Moon barycenter, used as the Earth's position.
    EarthMoonBarycenter,
    Mars,
    Jupiter,
    Saturn,
}

/// Keplerian elements at J2000 and their rates per Julian century.
///
/// Units: `a` in AU, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElements {
    pub semi_major_axis: [f64; 2],
    pub eccentricity: [f64; 2],
    pub inclination: [f64; 2],
    pub mean_longitude: [f64; 2],
    pub perihelion_longitude: [f64; 2],
    pub ascending_node_longitude: [f64; 2],
}

impl Planet {
    pub fn mean_elements(&self) -> MeanElements {
        match self {
            Planet::Mercury => MeanElements {
                semi_major_axis: [0.38709927, 0.00000037],
                eccentricity: [0.20563593, 0.00001906],
                inclination: [7.00497902, -0.00594749],
                mean_longitude: [252.25032350, 149472.67411175],
                perihelion_longitude: [77.45779628, 0.16047689],
                ascending_node_longitude: [48.33076593, -0.12534081],
            },
            Planet::Venus => MeanElements {
                semi_major_axis: [0.72333566, 0.00000390],
                eccentricity: [0.00677672, -0.00004107],
                inclination: [3.39467605, -0.00078890],
                mean_longitude: [181.97909950, 58517.81538729],
                perihelion_longitude: [131.60246718, 0.00268329],
                ascending_node_longitude: [76.67984255, -0.27769418],
            },
            Planet::EarthMoonBarycenter => MeanElements {
                semi_major_axis: [1.00000261, 0.00000562],
                eccentricity: [0.01671123, -0.00004392],
                inclination: [-0.00001531, -0.01294668],
                mean_longitude: [100.46457166, 35999.37244981],
                perihelion_longitude: [102.93768193, 0.32327364],
                ascending_node_longitude: [0.0, 0.0],
            },
            Planet::Mars => MeanElements {
                semi_major_axis: [1.52371034, 0.00001847],
                eccentricity: [0.09339410, 0.00007882],
                inclination: [1.84969142, -0.00813131],
                mean_longitude: [-4.55343205, 19140.30268499],
                perihelion_longitude: [-23.94362959, 0.44441088],
                ascending_node_longitude: [49.55953891, -0.29257343],
            },
            Planet::Jupiter => MeanElements {
                semi_major_axis: [5.20288700, -0.00011607],
                eccentricity: [0.04838624, -0.00013253],
                inclination: [1.30439695, -0.00183714],
                mean_longitude: [34.39644051, 3034.74612775],
                perihelion_longitude: [14.72847983, 0.21252668],
                ascending_node_longitude: [100.47390909, 0.20469106],
            },
            Planet::Saturn => MeanElements {
                semi_major_axis: [9.53667594, -0.00125060],
                eccentricity: [0.05386179, -0.00050991],
                inclination: [2.48599187, 0.00193609],
                mean_longitude: [49.95424423, 1222.49362201],
                perihelion_longitude: [92.59887831, -0.41897216],
                ascending_node_longitude: [113.66242448, -0.28867794],
            },
        }
    }

    /// Heliocentric position in the ecliptic and equinox of J2000, in AU.
    ///
    /// Arguments
    /// ---------
    /// * `tjm`: Modified Julian Date (TT).
    ///
    /// The orbital-plane coordinates are rotated to the ecliptic by
    /// `Rz(Ω) · Rx(i) · Rz(ω)`.
    pub fn heliocentric_position(&self, tjm: MJD) -> Result<Vector3<f64>, SkyError> {
        let t = (tjm - T2000) / 36525.0;
        let el = self.mean_elements();
        let at = |pair: [f64; 2]| pair[0] + pair[1] * t;

        let a = at(el.semi_major_axis);
        let e = at(el.eccentricity);
        let incl = at(el.inclination) * RADEG;
        let mean_lon = at(el.mean_longitude) * RADEG;
        let peri_lon = at(el.perihelion_longitude) * RADEG;
        let node = at(el.ascending_node_longitude) * RADEG;

        let arg_peri = peri_lon - node;
        let mean_anomaly = mean_lon - peri_lon;

        let ecc_anomaly = solve_kepler(mean_anomaly, e)?;

        let orbital_plane = Vector3::new(
            a * (ecc_anomaly.cos() - e),
            a * (1.0 - e * e).sqrt() * ecc_anomaly.sin(),
            0.0,
        );

        Ok(rotmt(node, 2) * rotmt(incl, 0) * rotmt(arg_peri, 2) * orbital_plane)
    }
}
