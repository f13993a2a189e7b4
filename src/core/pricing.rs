use crate::domain::model::{Parcel, ParcelRecord};
use crate::utils::error::Result;

/// Price a whole batch. Fails on the first over-limit parcel, naming its
/// tracking code, so a run that cannot be fully priced produces no output.
pub fn total_cost(parcels: &[Parcel]) -> Result<u32> {
    parcels
        .iter()
        .try_fold(0u32, |total, parcel| Ok(total + parcel.cost()?))
}

/// Materialize the serializable rows of the result file, pricing each parcel
/// along the way.
pub fn build_records(parcels: &[Parcel]) -> Result<Vec<ParcelRecord>> {
    parcels.iter().map(ParcelRecord::from_parcel).collect()
}
