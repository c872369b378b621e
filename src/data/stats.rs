use super::model::{Channel, HourlyRecord, CHANNEL_COUNT};

/// Pairwise Pearson correlations between all channels.
///
/// Entry `[i][j]` uses only hours where both channels have a value.
/// `None` when fewer than two such hours exist or either side is constant.
pub type CorrelationMatrix = [[Option<f64>; CHANNEL_COUNT]; CHANNEL_COUNT];

pub fn correlation_matrix(records: &[HourlyRecord]) -> CorrelationMatrix {
    let mut matrix = [[None; CHANNEL_COUNT]; CHANNEL_COUNT];
    for a in Channel::ALL {
        for b in Channel::ALL {
            if b < a {
                matrix[a.index()][b.index()] = matrix[b.index()][a.index()];
                continue;
            }
            matrix[a.index()][b.index()] = pearson(records.iter().filter_map(|r| {
                Some((r.value(a)?, r.value(b)?))
            }));
        }
    }
    matrix
}

fn pearson(pairs: impl Iterator<Item = (f64, f64)> + Clone) -> Option<f64> {
    let (n, sum_x, sum_y) = pairs
        .clone()
        .fold((0usize, 0.0, 0.0), |(n, sx, sy), (x, y)| (n + 1, sx + x, sy + y));
    if n < 2 {
        return None;
    }
    let mean_x = sum_x / n as f64;
    let mean_y = sum_y / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
