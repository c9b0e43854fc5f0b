pub mod yuv;
