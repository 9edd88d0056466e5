use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed nearest source column and row for every destination pixel.
/// Flat-shaded bands keep hard edges under nearest sampling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
    identity: bool,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        let map = |dst: usize, src: usize| -> Vec<usize> {
            if src == 0 {
                return vec![0; dst];
            }
            (0..dst).map(|d| (d * src / dst.max(1)).min(src - 1)).collect()
        };
        Self {
            src_x: map(dst_w, src_w),
            src_y: map(dst_h, src_h),
            identity: dst_w == src_w && dst_h == src_h,
        }
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.src_x.len(), self.src_y.len())
    }
}

/// Parallel nearest-neighbour stretch of `src` (row stride `sw`) into `dst`
/// (row stride `dw`). Rows are processed in parallel.
pub fn blit_nearest(dst: &mut [u32], dw: usize, src: &[u32], sw: usize, lut: &ScaleLut) {
    if dw == 0 || lut.src_y.is_empty() {
        return;
    }
    if lut.identity && dst.len() == src.len() {
        dst.copy_from_slice(src);
        return;
    }

    dst.par_chunks_mut(dw)
        .zip(lut.src_y.par_iter())
        .for_each(|(dst_row, &sy)| {
            let row = &src[sy * sw..(sy + 1) * sw];
            for (d, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
                *d = row[sx];
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_each_pixel() {
        let src = [1, 2, 3, 4]; // 2x2
        let lut = ScaleLut::new(4, 4, 2, 2);
        let mut dst = vec![0; 16];
        blit_nearest(&mut dst, 4, &src, 2, &lut);
        assert_eq!(
            dst,
            vec![1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]
        );
    }

    #[test]
    fn same_size_is_a_copy() {
        let src: Vec<u32> = (0..12).collect();
        let lut = ScaleLut::new(4, 3, 4, 3);
        let mut dst = vec![0; 12];
        blit_nearest(&mut dst, 4, &src, 4, &lut);
        assert_eq!(dst, src);
    }

    #[test]
    fn shrinking_samples_stay_in_bounds() {
        let src: Vec<u32> = (0..30).collect(); // 6x5
        let lut = ScaleLut::new(4, 2, 6, 5);
        assert_eq!(lut.dst_size(), (4, 2));
        let mut dst = vec![0; 8];
        blit_nearest(&mut dst, 4, &src, 6, &lut);
        assert_eq!(dst[0], 0);
        assert!(dst.iter().all(|&v| v < 30));
    }

    #[test]
    fn empty_lut_is_a_no_op() {
        let mut dst = vec![9; 4];
        blit_nearest(&mut dst, 2, &[1, 2, 3, 4], 2, &ScaleLut::empty());
        assert_eq!(dst, vec![9; 4]);
    }
}
