use crate::error::Error;
use crate::store::JobStore;
use tracing::debug;

/// Failure-rate percentages for every configured (platform, version) pair,
/// in platform-major order. `None` cells mean the store held no jobs at all.
pub struct RateMatrix {
    pub total: i64,
    pub platforms: Vec<PlatformRates>,
}

pub struct PlatformRates {
    pub platform: String,
    /// One cell per version label, in version-list order.
    pub rates: Vec<Option<f64>>,
}

pub async fn failure_rates(
    store: &JobStore,
    platforms: &[String],
    versions: &[String],
) -> Result<RateMatrix, Error> {
    let total = store.count_all().await?;

    let mut matrix = Vec::with_capacity(platforms.len());
    for platform in platforms {
        let mut rates = Vec::with_capacity(versions.len());
        for version in versions {
            let rate = if total == 0 {
                // empty store reports "no data", never divides by zero
                None
            } else {
                let failures = store.count_failures_matching(version, platform).await?;
                Some(failures as f64 / total as f64 * 100.0)
            };
            debug!(%platform, %version, ?rate, "computed failure rate");
            rates.push(rate);
        }
        matrix.push(PlatformRates {
            platform: platform.clone(),
            rates,
        });
    }

    Ok(RateMatrix {
        total,
        platforms: matrix,
    })
}
