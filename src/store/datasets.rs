use crate::data::{ProvincialSeries, RegionalSeries, Series};

/// Derived artifact pair, rebuilt together from the national series after
/// every confirmed refresh. Never updated piecemeal.
#[derive(Debug, Clone, Default)]
pub struct DigestArtifacts {
    pub digest: String,
    pub plot_png: Vec<u8>,
}

/// In-memory holder of the three current datasets plus the cached artifact
/// pair. Lives behind one `RwLock`; the scheduler tick is the sole writer,
/// so readers always see either the full old state or the full new one.
#[derive(Debug, Default)]
pub struct DatasetStore {
    national: Series,
    regional: RegionalSeries,
    provincial: ProvincialSeries,
    artifacts: DigestArtifacts,
}

impl DatasetStore {
    pub fn replace(
        &mut self,
        national: Series,
        regional: RegionalSeries,
        provincial: ProvincialSeries,
        artifacts: DigestArtifacts,
    ) {
        self.national = national;
        self.regional = regional;
        self.provincial = provincial;
        self.artifacts = artifacts;
    }

    pub fn national(&self) -> &Series {
        &self.national
    }

    pub fn region(&self, code: u32) -> Option<&Series> {
        self.regional.get(&code)
    }

    pub fn provincial(&self) -> &ProvincialSeries {
        &self.provincial
    }

    pub fn artifacts(&self) -> &DigestArtifacts {
        &self.artifacts
    }
}
