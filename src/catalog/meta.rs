//! Bibliographic metadata for the catalog ReadMe.
//!
//! Defaults describe the NESS overview paper. A JSON file may override any
//! subset of fields (`ness catalog --meta meta.json`).

use std::fs::File;
use std::path::Path;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogMeta {
    /// Archive designation, e.g. `J/MNRAS/512/1091`; blank until assigned.
    pub catalogue: String,
    pub title: String,
    pub authors: String,
    /// Short form used in file headers, e.g. `P. Scicluna+`.
    pub short_author: String,
    /// Publication year. `None` means the current year.
    pub date: Option<i32>,
    pub keywords: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub references: Vec<Reference>,
}

impl Default for CatalogMeta {
    fn default() -> Self {
        Self {
            catalogue: String::new(),
            title: "The Nearby Evolved Stars Survey II: Constructing a volume-limited sample \
                    and first results from the James Clerk Maxwell Telescope (Scicluna et al. 2021)"
                .to_string(),
            authors: "P. Scicluna, F. Kemper, I. McDonald, S. Srinivasan, A. Trejo, \
                      S. H. J. Wallstrom, J. G. A. Wouterloot, J. Cami, J. Greaves, Jinhua He, \
                      D. T. Hoai, Hyosun Kim, O. C. Jones, H. Shinnaga, C. J. R. Clark, \
                      T. Dharmawardena, W. Holland, H. Imai, J. Th. van Loon, K. M. Menten, \
                      R. Wesson, H. Chawner, S. Feng, S. Goldman, F. C. Liu, H. MacIsaac, J. Tang, \
                      S. Zeegers, K. Amada, V. Antoniou, A. Bemis, M. L. Boyer, S. Chapman, X. Chen, \
                      S.-H. Cho, L. Cui, F. Dell'Agli, P. Friberg, S. Fukaya, H. Gomez, Y. Gong, \
                      M. Hadjara, C. Haswell, N. Hirano, S. Hony, H. Izumiura, M. Jeste, X. Jiang, \
                      T. Kaminski, N. Keaveney, J. Kim, K. E. Kraemer, Y.-J. Kuan, E. Lagadec, \
                      C. F. Lee, D. Li, S.-Y. Liu, T. Liu, I. de Looze, F. Lykou, C. Maraston, \
                      J. P. Marshall, M. Matsuura, C. Min, M. Otsuka, M. Oyadomari, H. Parsons, \
                      N. A. Patel, E. Peeters, T. A. Pham, J. Qiu, S. Randall, G. Rau, M. P. Redman, \
                      A. M. S. Richards, S. Serjeant, C. Shi, G. C. Sloan, M. W. L. Smith, \
                      J. A. Toala, S. Uttenthaler, P. Ventura, B. Wang, I. Yamamura, T. Yang, \
                      Y. Yun, F. Zhang, Y. Zhang, G. Zhao, M. Zhu and A. A. Zijlstra"
                .to_string(),
            short_author: "P. Scicluna+".to_string(),
            date: Some(2021),
            keywords: "surveys - catalogues - stars: AGB and post-AGB - stars: mass-loss - \
                       stars: winds, outflows"
                .to_string(),
            abstract_text: "The Nearby Evolved Stars Survey (NESS) is a volume-complete sample of \
                ~850 Galactic evolved stars within 3 kpc at (sub-)mm wavelengths, observed in the \
                CO J = (2-1) and (3-2) rotational lines, and the sub-mm continuum, using the James \
                Clerk Maxwell Telescope and Atacama Pathfinder Experiment. NESS consists of five \
                tiers, based on distances and dust-production rate (DPR). We define a new metric \
                for estimating the distances to evolved stars and compare its results to Gaia \
                EDR3. Replicating other studies, the most-evolved, highly enshrouded objects in \
                the Galactic Plane dominate the dust returned by our sources, and we initially \
                estimate a total DPR of 4.7x10^-5 Msun/yr from our sample. Our sub-mm fluxes are \
                systematically higher and spectral indices are typically shallower than dust \
                models typically predict. The 450/850 um spectral indices are consistent with \
                the blackbody Rayleigh-Jeans regime, suggesting a large fraction of evolved stars \
                have unexpectedly large envelopes of cold dust."
                .to_string(),
            references: vec![Reference {
                url: "https://ui.adsabs.harvard.edu/abs/2021MNRAS.NNN.NNNNS/abstract".to_string(),
                description: "NESS overview paper".to_string(),
            }],
        }
    }
}

impl CatalogMeta {
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::input(format!("Failed to open catalog metadata '{}': {e}", path.display())))?;
        serde_json::from_reader(file)
            .map_err(|e| AppError::input(format!("Invalid catalog metadata '{}': {e}", path.display())))
    }

    pub fn year(&self) -> i32 {
        self.date.unwrap_or_else(|| chrono::Local::now().year())
    }
}
