/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// 5-tap Gaussian kernel used when sigma is derived from the kernel size:
/// [1, 4, 6, 4, 1] / 16.
pub const GAUSSIAN_KERNEL_5: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Side length of the median filter window.
pub const MEDIAN_WINDOW: usize = 5;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f64 = 1e-10;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Scale applied to (B - Y) for the U chrominance plane.
pub const CHROMA_U_SCALE: f32 = 0.492;

/// Scale applied to (R - Y) for the V chrominance plane.
pub const CHROMA_V_SCALE: f32 = 0.877;

/// Number of channels in a color frame (B, G, R).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Peak value used by the PSNR metric (8-bit range).
pub const PSNR_PEAK: f64 = 255.0;

/// Components retained by the loader when no explicit PCA target is given.
pub const DEFAULT_PCA_COMPONENTS: usize = 100;

/// File extensions accepted by the directory scan.
pub const DEFAULT_EXTENSIONS: [&str; 5] = [".JPEG", ".jpg", ".jpeg", ".png", ".bmp"];
