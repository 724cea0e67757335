// src/messages.rs
//! Localized (id-ID) inline messages shown by the flows

pub const FETCH_JOBS_FAILED: &str = "Gagal mengambil data magang";
pub const FETCH_JOBS_ERROR: &str = "Terjadi kesalahan saat mengambil data";

pub const LOGIN_FAILED: &str = "Login gagal. Periksa email dan password Anda.";
pub const GENERIC_ERROR: &str = "Terjadi kesalahan. Silakan coba lagi.";

pub const PASSWORD_MISMATCH: &str = "Password dan konfirmasi password tidak cocok.";
pub const REGISTER_FAILED: &str = "Registrasi gagal. Silakan coba lagi.";
pub const REGISTER_SUCCESS: &str = "Registrasi berhasil! Silakan login.";

pub const TOKEN_MISSING: &str = "Token tidak ditemukan";
pub const NEW_PASSWORD_MISMATCH: &str = "Password baru dan konfirmasi password tidak cocok";
pub const PROFILE_UPDATED: &str = "Profil berhasil diperbarui!";
pub const PROFILE_UPDATE_FAILED: &str = "Gagal memperbarui profil";
pub const PROFILE_UPDATE_ERROR: &str = "Terjadi kesalahan saat memperbarui profil";

pub const APPLY_LINK_MISSING: &str = "Link apply tidak tersedia untuk lowongan ini";
pub const NO_JOBS: &str = "Tidak ada lowongan magang yang ditemukan";
