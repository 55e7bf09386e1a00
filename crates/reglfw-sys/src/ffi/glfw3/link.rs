#[cfg(feature = "static")]
#[link(name = "glfw3", kind = "static")]
extern "C" {}

#[cfg(not(feature = "static"))]
// leaving off `kind = static` allows for the specification of a dynamic library if desired
#[cfg(target_family = "unix")]
#[link(name = "glfw")]
extern "C" {}

#[cfg(not(feature = "static"))]
#[cfg(target_family = "windows")]
#[link(name = "glfw3")]
extern "C" {}
