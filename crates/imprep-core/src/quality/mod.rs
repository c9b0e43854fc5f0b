pub mod psnr;
