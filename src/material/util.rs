pub fn reflect(i: glam::Vec3A) -> glam::Vec3A {
    glam::Vec3A::new(-i.x, -i.y, i.z)
}

/// `i` and the result are both in the local frame; `None` on total internal reflection.
pub fn refract(i: glam::Vec3A, ior: f32) -> Option<glam::Vec3A> {
    let ior_ratio = if i.z >= 0.0 { 1.0 / ior } else { ior };
    let o_z_sqr = 1.0 - (1.0 - i.z * i.z) * ior_ratio * ior_ratio;
    if o_z_sqr >= 0.0 {
        let o_z = if i.z >= 0.0 {
            -o_z_sqr.sqrt()
        } else {
            o_z_sqr.sqrt()
        };
        Some(glam::Vec3A::new(-i.x * ior_ratio, -i.y * ior_ratio, o_z))
    } else {
        None
    }
}

/// Unpolarized Fresnel reflectance of a dielectric interface.
pub fn fresnel(ior: f32, i: glam::Vec3A) -> f32 {
    let (i_ior, o_ior) = if i.z >= 0.0 { (1.0, ior) } else { (ior, 1.0) };

    match refract(i, ior) {
        Some(o) => {
            let cos_i = i.z.abs();
            let cos_o = o.z.abs();

            let rs = (i_ior * cos_i - o_ior * cos_o) / (i_ior * cos_i + o_ior * cos_o);
            let rp = (i_ior * cos_o - o_ior * cos_i) / (i_ior * cos_o + o_ior * cos_i);
            0.5 * (rs * rs + rp * rp)
        }
        None => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_incidence_fresnel_matches_r0() {
        let r0 = ((1.0 - 1.5_f32) / (1.0 + 1.5)).powi(2);
        assert!((fresnel(1.5, glam::Vec3A::Z) - r0).abs() < 1e-5);
        assert!((fresnel(1.5, -glam::Vec3A::Z) - r0).abs() < 1e-5);
    }

    #[test]
    fn total_internal_reflection() {
        let grazing = glam::Vec3A::new(0.9, 0.0, -(1.0f32 - 0.81).sqrt());
        assert!(refract(grazing, 1.5).is_none());
        assert_eq!(fresnel(1.5, grazing), 1.0);
    }

    #[test]
    fn refraction_bends_towards_normal() {
        let i = glam::Vec3A::new(0.5, 0.0, 0.75f32.sqrt());
        let o = refract(i, 1.5).unwrap();
        assert!(o.z < 0.0);
        assert!((o.x.abs() - 0.5 / 1.5).abs() < 1e-5);
        assert!((o.length() - 1.0).abs() < 1e-5);
    }
}
